//! Supplier reference data

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// Business partner delivering goods, identified by `code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Canonical value written into the visitor origin field
    pub value: String,
    pub label: String,
    pub code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

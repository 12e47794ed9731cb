//! Data models exchanged with the visitor backend

pub mod delivery;
pub mod employee;
pub mod supplier;
pub mod visitor;

use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use delivery::DeliveryManifestEntry;
pub use employee::{Employee, UpdateEmployee};
pub use supplier::Supplier;
pub use visitor::{CreatedVisitor, NewVisitor, Visitor, VisitorForm, VisitorPurpose};

/// Success envelope wrapping every backend payload: `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Deserialize a nullable string field into an empty string
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a nullable field into its type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept identifiers sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

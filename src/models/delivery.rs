//! Delivery manifest model

use serde::{Deserialize, Serialize};

use super::{null_as_empty, string_or_number};

/// Planned delivery that has not arrived yet.
///
/// The manifest is authored by the planning system and is never cleared when
/// a driver checks in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryManifestEntry {
    /// Delivery note number
    #[serde(deserialize_with = "string_or_number")]
    pub no_dn: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub driver_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub plat_number: String,
    /// `HH:MM[:SS]`, empty or absent
    #[serde(default)]
    pub plan_delivery_time: Option<String>,
    #[serde(default)]
    pub supplier_code: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
}

impl DeliveryManifestEntry {
    /// Scheduled time with missing treated as empty and whitespace trimmed
    pub fn normalized_time(&self) -> &str {
        normalize_time(self.plan_delivery_time.as_deref())
    }

    /// Origin recorded on check-in: supplier code, else supplier name
    pub fn origin(&self) -> &str {
        [self.supplier_code.as_deref(), self.supplier_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Scheduled time as `HH:MM`, or `-` when unknown
    pub fn display_time(&self) -> String {
        let time = self.normalized_time();
        if time.is_empty() {
            return "-".to_string();
        }
        let mut parts = time.split(':');
        match (parts.next(), parts.next()) {
            (Some(hours), Some(minutes)) => format!("{}:{}", hours, minutes),
            _ => time.to_string(),
        }
    }
}

pub fn normalize_time(time: Option<&str>) -> &str {
    time.unwrap_or("").trim()
}

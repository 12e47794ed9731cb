//! Visitor model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{null_as_default, null_as_empty, string_or_number};

/// Reason for a visit. Serialized as the backend's `visitor_needs` strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisitorPurpose {
    Meeting,
    Delivery,
    Contractor,
    Sortir,
    /// Value the kiosk does not know about, kept verbatim
    Other(String),
}

impl VisitorPurpose {
    /// Purposes a visitor can pick at the kiosk, in menu order
    pub const SELECTABLE: [VisitorPurpose; 4] = [
        VisitorPurpose::Meeting,
        VisitorPurpose::Delivery,
        VisitorPurpose::Contractor,
        VisitorPurpose::Sortir,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            VisitorPurpose::Meeting => "Meeting",
            VisitorPurpose::Delivery => "Delivery",
            VisitorPurpose::Contractor => "Contractor",
            VisitorPurpose::Sortir => "Sortir",
            VisitorPurpose::Other(s) => s,
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, VisitorPurpose::Delivery)
    }
}

/// A row with no purpose decodes as an unknown, empty one
impl Default for VisitorPurpose {
    fn default() -> Self {
        VisitorPurpose::Other(String::new())
    }
}

impl From<String> for VisitorPurpose {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Meeting" => VisitorPurpose::Meeting,
            "Delivery" => VisitorPurpose::Delivery,
            "Contractor" => VisitorPurpose::Contractor,
            "Sortir" => VisitorPurpose::Sortir,
            _ => VisitorPurpose::Other(s),
        }
    }
}

impl From<VisitorPurpose> for String {
    fn from(p: VisitorPurpose) -> Self {
        match p {
            VisitorPurpose::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for VisitorPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visitor record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    #[serde(deserialize_with = "string_or_number")]
    pub visitor_id: String,
    pub visitor_date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visitor_name: String,
    /// Origin: company name, or the supplier code for deliveries
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visitor_from: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visitor_host: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitor_needs: VisitorPurpose,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitor_amount: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visitor_vehicle: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub visitor_checkin: Option<String>,
    #[serde(default)]
    pub visitor_checkout: Option<String>,
    /// Scheduled time copied from the delivery manifest
    #[serde(default)]
    pub plan_delivery_time: Option<String>,
}

impl Visitor {
    pub fn is_checked_out(&self) -> bool {
        self.visitor_checkout.is_some()
    }

    /// On site on `day`: registered for that day and not yet checked out
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.visitor_date == day && !self.is_checked_out()
    }
}

/// Create visitor request (server assigns id and timestamps)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVisitor {
    pub visitor_date: NaiveDate,
    pub visitor_name: String,
    pub visitor_from: String,
    pub visitor_host: String,
    pub visitor_needs: VisitorPurpose,
    pub visitor_amount: u32,
    pub visitor_vehicle: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_delivery_time: Option<String>,
}

/// Payload of a successful create call
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedVisitor {
    #[serde(deserialize_with = "string_or_number")]
    pub visitor_id: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Editable check-in form record
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct VisitorForm {
    pub visitor_date: NaiveDate,
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub visitor_name: String,
    #[validate(custom(function = "not_blank", message = "Origin is required"))]
    pub visitor_from: String,
    #[validate(custom(function = "not_blank", message = "Host is required"))]
    pub visitor_host: String,
    #[validate(required(message = "Purpose is required"))]
    pub visitor_needs: Option<VisitorPurpose>,
    #[validate(range(min = 1, message = "At least one visitor"))]
    pub visitor_amount: u32,
    #[validate(custom(function = "not_blank", message = "Vehicle plate is required"))]
    pub visitor_vehicle: String,
    pub department: String,
}

impl VisitorForm {
    /// Blank form dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            visitor_date: today,
            visitor_name: String::new(),
            visitor_from: String::new(),
            visitor_host: String::new(),
            visitor_needs: None,
            visitor_amount: 1,
            visitor_vehicle: String::new(),
            department: String::new(),
        }
    }

    /// Validate every field, then build the create request.
    ///
    /// The visit date may not precede `today`.
    pub fn to_new_visitor(&self, today: NaiveDate) -> Result<NewVisitor, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.visitor_date < today {
            let mut error = ValidationError::new("past_date");
            error.message = Some("Date cannot be in the past".into());
            errors.add("visitor_date", error);
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(NewVisitor {
            visitor_date: self.visitor_date,
            visitor_name: self.visitor_name.trim().to_string(),
            visitor_from: self.visitor_from.trim().to_string(),
            visitor_host: self.visitor_host.trim().to_string(),
            // checked by validate() above
            visitor_needs: self.visitor_needs.clone().unwrap_or(VisitorPurpose::Meeting),
            visitor_amount: self.visitor_amount,
            visitor_vehicle: self.visitor_vehicle.trim().to_string(),
            department: self.department.clone(),
            plan_delivery_time: None,
        })
    }
}

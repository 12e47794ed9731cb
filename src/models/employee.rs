//! Employee reference data

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// Employee a visitor can be hosted by. `nik` is the employee number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub nik: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
}

/// Update employee request; name and `nik` are immutable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateEmployee {
    pub phone_number: String,
    pub department: String,
    pub email: String,
}

impl From<&Employee> for UpdateEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            phone_number: employee.phone_number.clone(),
            department: employee.department.clone(),
            email: employee.email.clone(),
        }
    }
}

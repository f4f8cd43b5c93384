//! Staff DTOs.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Staff member as returned by the API.
///
/// The server keys documents by `_id`; plain `id` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub department: String,
}

/// DTO for creating a staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStaff {
    pub name: String,
    pub department: String,
}

impl CreateStaff {
    /// Build a payload from raw form input, trimming and checking required fields.
    pub fn from_input(name: &str, department: &str) -> Result<Self> {
        let name = name.trim();
        let department = department.trim();

        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if department.is_empty() {
            return Err(AppError::validation("Department is required"));
        }

        Ok(Self {
            name: name.to_string(),
            department: department.to_string(),
        })
    }
}

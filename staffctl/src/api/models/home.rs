//! API models for the per-role home pages.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::{employees::EmployeeResponse, locations::LocationResponse};

/// Admin dashboard summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminHomeResponse {
    pub num_employees: i64,
    pub num_locations: i64,
}

/// Employee home: the caller's own record and placement.
///
/// `valid` is false for accounts with no detail row (admins land here via the
/// permission redirect) and the notice explains why nothing is shown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeHomeResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeResponse>,
    /// Present when the employee holds a placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResponse>,
}

/// Location contact home: the record for the caller's location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationHomeResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<EmployeeResponse>>,
}

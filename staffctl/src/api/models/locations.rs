//! API models for locations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::models::employees::EmployeeResponse,
    db::models::locations::LocationDBResponse,
    types::LocationId,
};

/// One location row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    /// Contact account email; doubles as the location's login
    pub email: String,
    pub num_employees: i32,
}

impl From<LocationDBResponse> for LocationResponse {
    fn from(db: LocationDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            address: db.address,
            email: db.email,
            num_employees: db.num_employees,
        }
    }
}

/// Request to create a location (and its contact account)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewLocationRequest {
    pub name: String,
    pub address: String,
    pub email: String,
}

/// Data backing the "new location" form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewLocationForm {
    pub message: String,
}

/// Detail page for one location: the record, its roster, and the bench
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationInfoResponse {
    pub location: LocationResponse,
    pub assigned: Vec<EmployeeResponse>,
    pub unassigned: Vec<EmployeeResponse>,
}

/// Assignment changes for one location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentUpdateRequest {
    /// Emails to place at this location
    #[serde(default)]
    pub emp_add: Vec<String>,
    /// Emails to remove from this location
    #[serde(default)]
    pub emp_remove: Vec<String>,
}

/// Result of an assignment update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentUpdateResponse {
    pub assigned: usize,
    pub removed: usize,
    pub message: String,
}

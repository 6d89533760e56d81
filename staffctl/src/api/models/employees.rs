//! API models for employees and placement changes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::models::users::Role,
    db::models::employees::EmployeeDBResponse,
    types::LocationId,
};

/// One employee detail row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub email: String,
    pub name: String,
    /// NULL when the employee is waiting for a placement
    pub assigned_location: Option<LocationId>,
}

impl From<EmployeeDBResponse> for EmployeeResponse {
    fn from(db: EmployeeDBResponse) -> Self {
        Self {
            email: db.email,
            name: db.name,
            assigned_location: db.assigned_location,
        }
    }
}

/// Request to create a new account (employee or admin)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewEmployeeRequest {
    pub name: String,
    pub email: String,
    /// Only meaningful for employee accounts; omit to leave unassigned
    pub assigned_to: Option<LocationId>,
    pub role: Role,
}

/// Data backing the "new employee" form: locations for the assignment dropdown
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewEmployeeForm {
    pub locations: Vec<crate::api::models::locations::LocationResponse>,
}

/// Request to delete employees, emails drawn from the roster view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteEmployeesRequest {
    pub emp_del: Vec<String>,
    /// Deletion only proceeds when the client confirms
    pub confirm: bool,
}

/// Result of a bulk delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteEmployeesResponse {
    pub deleted: usize,
    pub message: String,
}

/// Data backing the assignment page: every location plus the bench
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentForm {
    pub locations: Vec<crate::api::models::locations::LocationResponse>,
    pub unassigned: Vec<EmployeeResponse>,
}

//! Database models for employee detail rows.

use crate::types::LocationId;

/// Database request for creating an employee detail row together with its
/// login account. The inserts happen in one transaction; an initial placement
/// bumps the location counter in that same transaction.
#[derive(Debug, Clone)]
pub struct EmployeeCreateDBRequest {
    pub email: String,
    pub name: String,
    pub assigned_location: Option<LocationId>,
    pub password_hash: String,
}

/// Database response for an employee detail row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeDBResponse {
    pub email: String,
    pub name: String,
    pub assigned_location: Option<LocationId>,
}

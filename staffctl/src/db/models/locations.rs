//! Database models for locations.

use crate::types::LocationId;
use chrono::{DateTime, Utc};

/// Database request for creating a location together with its contact
/// account. Both rows are inserted in one transaction.
#[derive(Debug, Clone)]
pub struct LocationCreateDBRequest {
    pub name: String,
    pub address: String,
    pub email: String,
    pub password_hash: String,
}

/// Database response for a location
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationDBResponse {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub num_employees: i32,
    pub created_at: DateTime<Utc>,
}

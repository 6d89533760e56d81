//! Shared identifier types and small utilities.
//!
//! # Type Aliases
//!
//! - [`UserId`]: UUID identifying an account row
//! - [`LocationId`]: serial integer identifying a location row
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use std::fmt;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type LocationId = i32;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// The role requirement a guard enforces, carried in authorization errors so the
/// response can say what was missing without leaking anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    Admin,
    LocationContactOrAdmin,
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRequirement::Admin => write!(f, "an administrator account"),
            RoleRequirement::LocationContactOrAdmin => write!(f, "a location or administrator account"),
        }
    }
}

//! Database record models matching table schemas.
//!
//! Structs that correspond directly to table rows, used by the repositories in
//! [`crate::db::handlers`] to accept insertion/update data and return query
//! results. Kept separate from the API models so the schema can change without
//! touching the API contract.
//!
//! - [`users`]: login accounts (all three roles)
//! - [`employees`]: employee detail rows and their placement
//! - [`locations`]: locations and their occupancy counter

pub mod employees;
pub mod locations;
pub mod users;

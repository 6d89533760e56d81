//! API request and response data models.
//!
//! Data structures for HTTP request deserialization and response
//! serialization. These define the public API contract and are kept separate
//! from the database models in [`crate::db::models`] so storage and API
//! representations can evolve independently. All models carry `utoipa`
//! annotations for the generated OpenAPI document.
//!
//! - [`auth`]: Login, logout, and password change payloads
//! - [`users`]: The [`users::Role`] ladder and session user types
//! - [`employees`]: Employee records and assignment requests
//! - [`home`]: Per-role home page payloads
//! - [`locations`]: Location records and rosters

pub mod auth;
pub mod employees;
pub mod home;
pub mod locations;
pub mod users;

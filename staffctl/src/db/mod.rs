//! Database layer for data persistence and access.
//!
//! SQLx over PostgreSQL, following the repository pattern: request handlers
//! talk to repositories in [`handlers`], which read and write the record
//! structs in [`models`]. Errors are categorized in [`errors`].

pub mod errors;
pub mod handlers;
pub mod models;

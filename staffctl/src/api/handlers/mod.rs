//! HTTP request handlers.
//!
//! Handlers translate HTTP requests into repository calls and map the results
//! into the API models. Authorization is not checked here: the guards in
//! [`crate::auth::middleware`] run first, per route group, in the router
//! assembled by [`crate::build_router`].
//!
//! - [`auth`]: login, logout, and password change
//! - [`home`]: per-role home pages, root redirect, liveness
//! - [`employees`]: employee CRUD and the assignment form
//! - [`locations`]: location CRUD and assignment changes

pub mod auth;
pub mod employees;
pub mod home;
pub mod locations;

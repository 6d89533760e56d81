//! HTTP API layer.
//!
//! - [`models`]: request/response types (the public contract)
//! - [`handlers`]: the request handlers behind each route

pub mod handlers;
pub mod models;

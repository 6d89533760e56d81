//! Authentication and authorization.
//!
//! Browser-style session authentication:
//! - Users log in via `/login` with email/password
//! - A signed JWT is stored in a secure, HTTP-only cookie
//! - Tokens expire after the configured session timeout
//!
//! Authorization is a strict role ladder (`Employee` < `LocationContact` <
//! `Admin`), enforced by the guards in [`middleware`]. A failed guard returns
//! a JSON error carrying the page the client should redirect to.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated user in handlers
//! - [`middleware`]: Route protection guards
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification

pub mod current_user;
pub mod middleware;
pub mod password;
pub mod session;

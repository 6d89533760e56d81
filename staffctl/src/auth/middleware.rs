//! Route protection middleware.
//!
//! Three guards, layered per route group:
//! - [`require_authenticated`]: any logged-in user
//! - [`require_location_contact`]: location contacts and admins
//! - [`require_admin`]: admins only
//!
//! Each guard resolves the session user once and stores it as a request
//! extension, so handlers behind a guard get the user without re-verifying
//! the token. Failures map to redirect responses: unauthenticated requests
//! point at the login page, under-privileged ones at the employee home.

use crate::{
    AppState,
    api::models::users::{CurrentUser, Role},
    errors::Error,
    types::RoleRequirement,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::trace;

async fn authenticate(state: &AppState, request: Request) -> Result<(CurrentUser, Request), Error> {
    let (mut parts, body) = request.into_parts();
    let user = CurrentUser::from_request_parts(&mut parts, state).await?;
    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(user.clone());
    Ok((user, request))
}

/// Require any authenticated user.
pub async fn require_authenticated(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let (user, request) = authenticate(&state, request).await?;
    trace!("Authenticated user {} ({})", user.email, user.role);
    Ok(next.run(request).await)
}

/// Require a location contact or admin account.
pub async fn require_location_contact(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let (user, request) = authenticate(&state, request).await?;
    match user.role {
        Role::LocationContact | Role::Admin => Ok(next.run(request).await),
        Role::Employee => Err(Error::InsufficientPermissions {
            required: RoleRequirement::LocationContactOrAdmin,
        }),
    }
}

/// Require an admin account.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let (user, request) = authenticate(&state, request).await?;
    match user.role {
        Role::Admin => Ok(next.run(request).await),
        Role::Employee | Role::LocationContact => Err(Error::InsufficientPermissions {
            required: RoleRequirement::Admin,
        }),
    }
}

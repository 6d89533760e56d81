//! API models for authentication.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::users::UserResponse;

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login/auth response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Landing page for the user's role
    pub home: String,
    pub message: String,
}

/// Simple success message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthSuccessResponse {
    pub message: String,
}

/// Login info shown on the login page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginInfo {
    pub message: String,
}

/// Password change request payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Login response: auth body plus the session cookie
#[derive(Debug)]
pub struct LoginResponse {
    pub auth_response: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        match header::HeaderValue::from_str(&self.cookie) {
            Ok(cookie) => ([(header::SET_COOKIE, cookie)], Json(self.auth_response)).into_response(),
            Err(e) => crate::errors::Error::Internal {
                operation: format!("encode session cookie header: {e}"),
            }
            .into_response(),
        }
    }
}

/// Logout response: success body plus the clearing cookie
#[derive(Debug)]
pub struct LogoutResponse {
    pub auth_response: AuthSuccessResponse,
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        match header::HeaderValue::from_str(&self.cookie) {
            Ok(cookie) => ([(header::SET_COOKIE, cookie)], Json(self.auth_response)).into_response(),
            Err(e) => crate::errors::Error::Internal {
                operation: format!("encode session cookie header: {e}"),
            }
            .into_response(),
        }
    }
}

/// Redirect hint for API clients mirroring the original page redirects
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    pub redirect_to: String,
}

impl RedirectResponse {
    pub fn to(target: &str) -> Self {
        Self {
            redirect_to: target.to_string(),
        }
    }
}

impl IntoResponse for RedirectResponse {
    fn into_response(self) -> Response {
        (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, self.redirect_to.clone())], Json(self)).into_response()
    }
}

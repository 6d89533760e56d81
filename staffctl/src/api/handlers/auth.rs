//! Authentication handlers: login, logout, password change.

use axum::{Json, extract::State};
use tracing::info;

use crate::{
    AppState,
    api::models::{
        auth::{AuthResponse, AuthSuccessResponse, ChangePasswordRequest, LoginInfo, LoginRequest, LoginResponse, LogoutResponse},
        users::{CurrentUser, UserResponse},
    },
    auth::{password, session},
    db::{
        handlers::{Repository, Users},
        models::users::UserUpdateDBRequest,
    },
    errors::Error,
};

/// Get login page info
#[utoipa::path(
    get,
    path = "/login",
    tag = "authentication",
    responses(
        (status = 200, description = "Login info", body = LoginInfo),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_login_info() -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Log in with your account email and password".to_string(),
    })
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    // Field check happens before any credential lookup
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(Error::BadRequest {
            message: "Please fill all fields".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Unknown email and wrong password are logged apart but surface the same
    // generic message, so the response doesn't leak which emails exist.
    let user = match user_repo.get_user_by_email(&request.email).await? {
        Some(user) => user,
        None => {
            info!("Login attempt for unknown email");
            return Err(Error::Unauthenticated {
                message: Some("Invalid email or password".to_string()),
            });
        }
    };

    // Verify password on a blocking thread to avoid blocking the async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        info!("Login attempt with wrong password for {}", user.email);
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    let user_response = UserResponse::from(user);
    let home = user_response.role.home_path().to_string();

    // Create session token and cookie
    let current_user: CurrentUser = user_response.clone().into();
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        user: user_response,
        home,
        message: "Login successful".to_string(),
    };

    Ok(LoginResponse { auth_response, cookie })
}

/// Logout (clear session)
#[utoipa::path(
    get,
    path = "/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse, Error> {
    let auth_response = AuthSuccessResponse {
        message: "You are now logged out".to_string(),
    };

    Ok(LogoutResponse {
        auth_response,
        cookie: clear_session_cookie(&state.config),
    })
}

/// Get password change page info
#[utoipa::path(
    get,
    path = "/updatePassword",
    tag = "authentication",
    responses(
        (status = 200, description = "Password change info", body = LoginInfo),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_update_password_info() -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Enter your current password and the new password".to_string(),
    })
}

/// Change the caller's password
///
/// Success ends the session (the clearing cookie is set), forcing a fresh
/// login with the new password.
#[utoipa::path(
    post,
    path = "/updatePassword",
    request_body = ChangePasswordRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Password changed", body = AuthSuccessResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Wrong current password or not logged in"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<LogoutResponse, Error> {
    // Field check happens before any credential verification, as on login
    if request.current_password.is_empty() || request.new_password.is_empty() {
        return Err(Error::BadRequest {
            message: "Please fill all fields".to_string(),
        });
    }

    let password_config = &state.config.auth.password;
    if request.new_password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.new_password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    let user = user_repo
        .get_by_id(current_user.id)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    let current = request.current_password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&current, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Current password is incorrect".to_string()),
        });
    }

    // Hash the new password on a blocking thread
    let params = (&state.config.auth.password).into();
    let new_password = request.new_password.clone();
    let new_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&new_password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    user_repo
        .update(
            current_user.id,
            &UserUpdateDBRequest {
                password_hash: Some(new_hash),
            },
        )
        .await?;

    info!("Password changed for {}", current_user.email);

    Ok(LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Password changed, please log in again".to_string(),
        },
        cookie: clear_session_cookie(&state.config),
    })
}

/// Helper function to create a session cookie
pub(crate) fn create_session_cookie(token: &str, config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;
    let max_age = session_config.timeout.as_secs();

    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
        session_config.cookie_name, token, session_config.cookie_same_site, max_age
    );
    if session_config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Helper function to create an expired cookie that clears the session
pub(crate) fn clear_session_cookie(config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;

    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite={}; Max-Age=0",
        session_config.cookie_name, session_config.cookie_same_site
    );
    if session_config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

//! Extracting the authenticated user from a request.

use crate::{AppState, api::models::users::CurrentUser, auth::session, errors::{Error, Result}};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract user from JWT session cookie if present and valid
/// Returns:
/// - None: No session cookie present (or token expired/invalid)
/// - Some(Ok(user)): Valid session token found and verified
/// - Some(Err(error)): Cookie header present but unreadable
#[instrument(skip(parts, config))]
pub(crate) fn try_jwt_session_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name == cookie_name {
                match session::verify_session_token(value, config) {
                    Ok(user) => return Some(Ok(user)),
                    Err(_) => {
                        // Expired or tampered token. Expected during normal
                        // operation, so treat it the same as no cookie.
                        continue;
                    }
                }
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // A guard further up the stack may already have resolved the user.
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            trace!("Reusing user from request extensions: {}", user.id);
            return Ok(user.clone());
        }

        match try_jwt_session_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found session authenticated user: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => Err(e),
            None => {
                trace!("No session cookie on request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use axum::http::Request;
    use uuid::Uuid;

    fn test_config() -> crate::config::Config {
        crate::config::Config {
            secret_key: Some("unit-test-secret".to_string()),
            ..Default::default()
        }
    }

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, _body) = Request::builder()
            .uri("/viewEmployees")
            .header(axum::http::header::COOKIE, cookie)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_valid_cookie_resolves_user() {
        let config = test_config();
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        let token = session::create_session_token(&user, &config).unwrap();

        let parts = parts_with_cookie(&format!("{}={}", config.auth.session.cookie_name, token));
        let result = try_jwt_session_auth(&parts, &config).unwrap().unwrap();

        assert_eq!(result.id, user.id);
        assert_eq!(result.role, Role::Admin);
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let config = test_config();
        let (parts, _body) = Request::builder().uri("/").body(()).unwrap().into_parts();
        assert!(try_jwt_session_auth(&parts, &config).is_none());
    }

    #[test]
    fn test_tampered_cookie_is_none() {
        let config = test_config();
        let parts = parts_with_cookie(&format!("{}=not.a.real.token", config.auth.session.cookie_name));
        assert!(try_jwt_session_auth(&parts, &config).is_none());
    }

    #[test]
    fn test_other_cookies_ignored() {
        let config = test_config();
        let parts = parts_with_cookie("theme=dark; tracking=off");
        assert!(try_jwt_session_auth(&parts, &config).is_none());
    }
}

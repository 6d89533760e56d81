//! OpenAPI documentation for the placement API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;

/// Session cookie security scheme.
struct SessionSecurityAddon;

impl Modify for SessionSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "staffctl_session",
                    "JWT session cookie set by POST /login",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "staffctl API",
        description = "Employee-to-location placement service. Log in via POST /login; \
            the session cookie authorizes the rest of the API according to your role."
    ),
    paths(
        api::handlers::home::root,
        api::handlers::home::healthz,
        api::handlers::home::employer_home,
        api::handlers::home::employee_home,
        api::handlers::home::loc_user_home,
        api::handlers::auth::get_login_info,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::get_update_password_info,
        api::handlers::auth::update_password,
        api::handlers::employees::view_employees,
        api::handlers::employees::new_employee_form,
        api::handlers::employees::new_employee,
        api::handlers::employees::delete_employees_form,
        api::handlers::employees::delete_employees,
        api::handlers::employees::assign_employees_form,
        api::handlers::locations::view_locations,
        api::handlers::locations::new_location_form,
        api::handlers::locations::new_location,
        api::handlers::locations::location_info,
        api::handlers::locations::update_assignments,
    ),
    modifiers(&SessionSecurityAddon),
    tags(
        (name = "home", description = "Landing pages and liveness"),
        (name = "authentication", description = "Sessions and passwords"),
        (name = "employees", description = "Employee management (admin)"),
        (name = "locations", description = "Location management (admin)"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/locationInfo/{id}"));
        assert!(json.contains("SessionCookie"));
    }
}

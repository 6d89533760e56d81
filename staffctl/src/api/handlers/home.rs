//! Home page handlers: one landing endpoint per role, plus the root redirect
//! and liveness probe.

use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    AppState,
    api::models::{
        auth::RedirectResponse,
        employees::EmployeeResponse,
        home::{AdminHomeResponse, EmployeeHomeResponse, LocationHomeResponse},
        locations::LocationResponse,
        users::CurrentUser,
    },
    db::handlers::{Employees, Locations, Repository},
    errors::{Error, LOGIN_PATH},
};

/// Liveness response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Root: send clients to the login page
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 307, description = "Redirect to login"),
    )
)]
pub async fn root() -> RedirectResponse {
    RedirectResponse::to(LOGIN_PATH)
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "home",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Admin dashboard: workforce and location counts
#[utoipa::path(
    get,
    path = "/employerHome",
    tag = "home",
    responses(
        (status = 200, description = "Dashboard summary", body = AdminHomeResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn employer_home(State(state): State<AppState>) -> Result<Json<AdminHomeResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let num_employees = Employees::new(&mut conn).count().await?;
    let num_locations = Locations::new(&mut conn).count().await?;

    Ok(Json(AdminHomeResponse {
        num_employees,
        num_locations,
    }))
}

/// Employee home: the caller's own record and placement
#[utoipa::path(
    get,
    path = "/employeeHome",
    tag = "home",
    responses(
        (status = 200, description = "The caller's placement", body = EmployeeHomeResponse),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn employee_home(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<EmployeeHomeResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let employee = Employees::new(&mut conn).get_by_id(current_user.email.clone()).await?;

    let Some(employee) = employee else {
        // Admin and contact accounts land here via the permission redirect
        return Ok(Json(EmployeeHomeResponse {
            valid: false,
            notice: Some("No employee record is linked to this account".to_string()),
            employee: None,
            location: None,
        }));
    };

    let location = match employee.assigned_location {
        Some(id) => Locations::new(&mut conn).get_by_id(id).await?.map(LocationResponse::from),
        None => None,
    };

    Ok(Json(EmployeeHomeResponse {
        valid: true,
        notice: None,
        employee: Some(employee.into()),
        location,
    }))
}

/// Location contact home: the caller's location and its roster
#[utoipa::path(
    get,
    path = "/locUserHome",
    tag = "home",
    responses(
        (status = 200, description = "The caller's location", body = LocationHomeResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not a location or admin account"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn loc_user_home(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<LocationHomeResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let location = Locations::new(&mut conn).get_by_email(&current_user.email).await?;

    let Some(location) = location else {
        // Admins pass the guard but manage no location of their own
        return Ok(Json(LocationHomeResponse {
            valid: false,
            notice: Some("No location is linked to this account".to_string()),
            location: None,
            roster: None,
        }));
    };

    let roster = Employees::new(&mut conn)
        .list(&crate::db::handlers::employees::EmployeeFilter::at_location(location.id))
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(LocationHomeResponse {
        valid: true,
        notice: None,
        location: Some(location.into()),
        roster: Some(roster),
    }))
}

//! Location management handlers (admin only).

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use crate::{
    AppState,
    api::models::{
        employees::EmployeeResponse,
        locations::{
            AssignmentUpdateRequest, AssignmentUpdateResponse, LocationInfoResponse, LocationResponse, NewLocationForm,
            NewLocationRequest,
        },
    },
    auth::password,
    db::{
        handlers::{Employees, Locations, Repository, employees::EmployeeFilter, locations::LocationFilter},
        models::locations::LocationCreateDBRequest,
    },
    errors::Error,
    types::LocationId,
};

/// List every location
#[utoipa::path(
    get,
    path = "/viewLocations",
    tag = "locations",
    responses(
        (status = 200, description = "All locations", body = Vec<LocationResponse>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn view_locations(State(state): State<AppState>) -> Result<Json<Vec<LocationResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let locations = Locations::new(&mut conn)
        .list(&LocationFilter::default())
        .await?
        .into_iter()
        .map(LocationResponse::from)
        .collect();

    Ok(Json(locations))
}

/// Data for the "new location" form
#[utoipa::path(
    get,
    path = "/newLocation",
    tag = "locations",
    responses(
        (status = 200, description = "Form data", body = NewLocationForm),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn new_location_form() -> Json<NewLocationForm> {
    Json(NewLocationForm {
        message: "Provide the location name, address, and a contact email".to_string(),
    })
}

/// Create a location and its contact account
///
/// The contact account starts with the configured placeholder password, like
/// new employee accounts.
#[utoipa::path(
    post,
    path = "/newLocation",
    request_body = NewLocationRequest,
    tag = "locations",
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Location with that email already exists"),
    )
)]
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn new_location(
    State(state): State<AppState>,
    Json(request): Json<NewLocationRequest>,
) -> Result<(axum::http::StatusCode, Json<LocationResponse>), Error> {
    if request.name.trim().is_empty() || request.address.trim().is_empty() || request.email.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Please fill all fields".to_string(),
        });
    }

    let placeholder = state.config.default_employee_password.clone();
    let params = (&state.config.auth.password).into();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&placeholder, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let location = Locations::new(&mut conn)
        .create(&LocationCreateDBRequest {
            name: request.name,
            address: request.address,
            email: request.email,
            password_hash,
        })
        .await?;

    info!("Created location {} ({})", location.name, location.id);

    Ok((axum::http::StatusCode::CREATED, Json(location.into())))
}

/// One location, its roster, and the bench
#[utoipa::path(
    get,
    path = "/locationInfo/{id}",
    tag = "locations",
    params(
        ("id" = i32, Path, description = "Location ID"),
    ),
    responses(
        (status = 200, description = "Location detail", body = LocationInfoResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such location"),
    )
)]
#[tracing::instrument(skip_all, fields(location_id = id))]
pub async fn location_info(State(state): State<AppState>, Path(id): Path<LocationId>) -> Result<Json<LocationInfoResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let location = Locations::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "location".to_string(),
        id: id.to_string(),
    })?;

    let mut employees = Employees::new(&mut conn);
    let assigned = employees
        .list(&EmployeeFilter::at_location(id))
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();
    let unassigned = employees
        .list(&EmployeeFilter::unassigned())
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(LocationInfoResponse {
        location: location.into(),
        assigned,
        unassigned,
    }))
}

/// Apply assignment changes for one location
///
/// Additions place unassigned (or elsewhere-assigned) employees here;
/// removals send employees back to the bench. Each change runs in its own
/// transaction, so the occupancy counters always match the detail rows.
#[utoipa::path(
    post,
    path = "/locationInfo/{id}",
    request_body = AssignmentUpdateRequest,
    tag = "locations",
    params(
        ("id" = i32, Path, description = "Location ID"),
    ),
    responses(
        (status = 200, description = "Assignment report", body = AssignmentUpdateResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such location or employee"),
    )
)]
#[tracing::instrument(skip_all, fields(location_id = id))]
pub async fn update_assignments(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
    Json(request): Json<AssignmentUpdateRequest>,
) -> Result<Json<AssignmentUpdateResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    // 404 before touching any placements
    Locations::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "location".to_string(),
        id: id.to_string(),
    })?;

    let mut employees = Employees::new(&mut conn);

    let mut assigned = 0;
    for email in &request.emp_add {
        employees.assign(email, id).await.map_err(|e| match e {
            crate::db::errors::DbError::NotFound => Error::NotFound {
                resource: "employee".to_string(),
                id: email.clone(),
            },
            other => Error::Database(other),
        })?;
        assigned += 1;
    }

    let mut removed = 0;
    for email in &request.emp_remove {
        employees.unassign(email).await.map_err(|e| match e {
            crate::db::errors::DbError::NotFound => Error::NotFound {
                resource: "employee".to_string(),
                id: email.clone(),
            },
            other => Error::Database(other),
        })?;
        removed += 1;
    }

    info!("Assignments for location {id}: +{assigned} -{removed}");

    Ok(Json(AssignmentUpdateResponse {
        assigned,
        removed,
        message: format!("Assigned {assigned}, removed {removed}"),
    }))
}

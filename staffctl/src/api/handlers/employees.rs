//! Employee management handlers (admin only).

use axum::{Json, extract::State};
use tracing::{info, warn};

use crate::{
    AppState,
    api::models::{
        employees::{
            AssignmentForm, DeleteEmployeesRequest, DeleteEmployeesResponse, EmployeeResponse, NewEmployeeForm, NewEmployeeRequest,
        },
        locations::LocationResponse,
        users::Role,
    },
    auth::password,
    db::{
        handlers::{Employees, Locations, Repository, Users, employees::EmployeeFilter, locations::LocationFilter},
        models::{employees::EmployeeCreateDBRequest, users::UserCreateDBRequest},
    },
    errors::Error,
};

/// List every employee detail row
#[utoipa::path(
    get,
    path = "/viewEmployees",
    tag = "employees",
    responses(
        (status = 200, description = "All employees", body = Vec<EmployeeResponse>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn view_employees(State(state): State<AppState>) -> Result<Json<Vec<EmployeeResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let employees = Employees::new(&mut conn)
        .list(&EmployeeFilter::default())
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(employees))
}

/// Data for the "new employee" form: locations for the assignment dropdown
#[utoipa::path(
    get,
    path = "/newEmployee",
    tag = "employees",
    responses(
        (status = 200, description = "Form data", body = NewEmployeeForm),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn new_employee_form(State(state): State<AppState>) -> Result<Json<NewEmployeeForm>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let locations = Locations::new(&mut conn)
        .list(&LocationFilter::default())
        .await?
        .into_iter()
        .map(LocationResponse::from)
        .collect();

    Ok(Json(NewEmployeeForm { locations }))
}

/// Create an employee or admin account
///
/// The account starts with the configured placeholder password, which the
/// admin hands over out of band. Employee accounts get a detail row and,
/// optionally, an initial placement; admin accounts only get the login.
#[utoipa::path(
    post,
    path = "/newEmployee",
    request_body = NewEmployeeRequest,
    tag = "employees",
    responses(
        (status = 201, description = "Account created", body = EmployeeResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Email already in use"),
    )
)]
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn new_employee(
    State(state): State<AppState>,
    Json(request): Json<NewEmployeeRequest>,
) -> Result<(axum::http::StatusCode, Json<EmployeeResponse>), Error> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Please fill all fields".to_string(),
        });
    }
    if request.role == Role::LocationContact {
        return Err(Error::BadRequest {
            message: "Location accounts are created via /newLocation".to_string(),
        });
    }

    // Fresh salt per account, even though the placeholder is shared
    let placeholder = state.config.default_employee_password.clone();
    let params = (&state.config.auth.password).into();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&placeholder, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let employee = match request.role {
        Role::Employee => Employees::new(&mut conn)
            .create(&EmployeeCreateDBRequest {
                email: request.email.clone(),
                name: request.name.clone(),
                assigned_location: request.assigned_to,
                password_hash,
            })
            .await?
            .into(),
        Role::Admin => {
            let user = Users::new(&mut conn)
                .create(&UserCreateDBRequest {
                    email: request.email.clone(),
                    role: Role::Admin,
                    password_hash,
                })
                .await?;
            EmployeeResponse {
                email: user.email,
                name: request.name.clone(),
                assigned_location: None,
            }
        }
        Role::LocationContact => unreachable!("rejected above"),
    };

    info!("Created {} account for {}", request.role, request.email);

    Ok((axum::http::StatusCode::CREATED, Json(employee)))
}

/// Roster for the delete page
#[utoipa::path(
    get,
    path = "/deleteEmployee",
    tag = "employees",
    responses(
        (status = 200, description = "All employees", body = Vec<EmployeeResponse>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_employees_form(State(state): State<AppState>) -> Result<Json<Vec<EmployeeResponse>>, Error> {
    view_employees(State(state)).await
}

/// Delete the selected employees
///
/// Each employee is removed in its own transaction; a held placement releases
/// the location counter as part of that transaction.
#[utoipa::path(
    post,
    path = "/deleteEmployee",
    request_body = DeleteEmployeesRequest,
    tag = "employees",
    responses(
        (status = 200, description = "Deletion report", body = DeleteEmployeesResponse),
        (status = 400, description = "Not confirmed"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all, fields(count = request.emp_del.len()))]
pub async fn delete_employees(
    State(state): State<AppState>,
    Json(request): Json<DeleteEmployeesRequest>,
) -> Result<Json<DeleteEmployeesResponse>, Error> {
    if !request.confirm {
        return Err(Error::BadRequest {
            message: "Deletion must be confirmed".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Employees::new(&mut conn);

    let mut deleted = 0;
    for email in &request.emp_del {
        if repo.delete(email.clone()).await? {
            deleted += 1;
        } else {
            warn!("Skipped delete for unknown employee {email}");
        }
    }

    info!("Deleted {deleted} employee(s)");

    Ok(Json(DeleteEmployeesResponse {
        deleted,
        message: format!("Deleted {deleted} employee(s)"),
    }))
}

/// Data for the assignment page: every location plus the unassigned bench
#[utoipa::path(
    get,
    path = "/assignEmployees",
    tag = "employees",
    responses(
        (status = 200, description = "Assignment form data", body = AssignmentForm),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn assign_employees_form(State(state): State<AppState>) -> Result<Json<AssignmentForm>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let locations = Locations::new(&mut conn)
        .list(&LocationFilter::default())
        .await?
        .into_iter()
        .map(LocationResponse::from)
        .collect();

    let unassigned = Employees::new(&mut conn)
        .list(&EmployeeFilter::unassigned())
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(AssignmentForm { locations, unassigned }))
}

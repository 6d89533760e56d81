//! # staffctl
//!
//! A session-authenticated service for placing employees at physical
//! locations. Three account roles share one login:
//!
//! - **Admin**: manages accounts, locations, and placements
//! - **Employee**: sees their own placement
//! - **LocationContact**: sees the roster for their location
//!
//! The HTTP surface keeps the classic page routes (`/login`,
//! `/viewEmployees`, `/locationInfo/{id}`, ...) but serves JSON; guard
//! failures return the page the client should redirect to. Each location row
//! carries an occupancy counter that is kept in lockstep with the placement
//! rows by running every placement change in a single transaction.
//!
//! ## Quick start
//!
//! ```ignore
//! let args = staffctl::config::Args::parse();
//! let config = staffctl::Config::load(&args)?;
//! staffctl::Application::new(config).await?.serve(shutdown_signal()).await
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::middleware::{require_admin, require_authenticated, require_location_contact},
    auth::password,
    db::handlers::{Repository, Users},
    db::models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    openapi::ApiDoc,
};
use anyhow::Context;
use axum::{
    Router,
    http::{self, HeaderValue},
    middleware::from_fn_with_state,
    routing::get,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{LocationId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the staffctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: creates the admin account on first startup, or refreshes its
/// password when one is configured. Returns the admin's user ID.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(email: &str, password: Option<&str>, db: &PgPool) -> anyhow::Result<UserId> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_string(pwd).context("hash admin password")?),
        None => None,
    };

    let mut tx = db.begin().await?;
    let mut user_repo = Users::new(&mut tx);

    if let Some(existing_user) = user_repo.get_user_by_email(email).await? {
        if let Some(password_hash) = password_hash {
            user_repo
                .update(
                    existing_user.id,
                    &UserUpdateDBRequest {
                        password_hash: Some(password_hash),
                    },
                )
                .await?;
        }
        tx.commit().await?;
        return Ok(existing_user.id);
    }

    // Without a configured password the admin gets a placeholder hash that
    // verifies against nothing useful until it is rotated.
    let password_hash = match password_hash {
        Some(hash) => hash,
        None => password::hash_string(&uuid::Uuid::new_v4().to_string()).context("hash generated admin password")?,
    };

    let created_user = user_repo
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            role: Role::Admin,
            password_hash,
        })
        .await?;

    tx.commit().await?;
    info!("Created initial admin user {email}");
    Ok(created_user.id)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>().with_context(|| format!("invalid CORS origin {origin}"))?);
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    Ok(cors)
}

/// Build the main application router.
///
/// Routes are grouped by the guard they sit behind; each group gets its guard
/// as a `route_layer`, so authorization runs before any handler and unmatched
/// paths fall through to a plain 404 without touching the guards.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth as auth_handlers, employees, home, locations};

    let public_routes = Router::new()
        .route("/", get(home::root))
        .route("/healthz", get(home::healthz))
        .route("/login", get(auth_handlers::get_login_info).post(auth_handlers::login));

    let authenticated_routes = Router::new()
        .route("/logout", get(auth_handlers::logout))
        .route("/employeeHome", get(home::employee_home))
        .route(
            "/updatePassword",
            get(auth_handlers::get_update_password_info).post(auth_handlers::update_password),
        )
        .route_layer(from_fn_with_state(state.clone(), require_authenticated));

    let location_routes = Router::new()
        .route("/locUserHome", get(home::loc_user_home))
        .route_layer(from_fn_with_state(state.clone(), require_location_contact));

    let admin_routes = Router::new()
        .route("/employerHome", get(home::employer_home))
        .route("/viewEmployees", get(employees::view_employees))
        .route("/viewLocations", get(locations::view_locations))
        .route("/assignEmployees", get(employees::assign_employees_form))
        .route(
            "/deleteEmployee",
            get(employees::delete_employees_form).post(employees::delete_employees),
        )
        .route(
            "/locationInfo/{id}",
            get(locations::location_info).post(locations::update_assignments),
        )
        .route("/newEmployee", get(employees::new_employee_form).post(employees::new_employee))
        .route("/newLocation", get(locations::new_location_form).post(locations::new_location))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let router = Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(location_routes)
        .merge(admin_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and ensures the initial admin account exists
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting staffctl with configuration: {:#?}", config);

        let database_url = config
            .database_url
            .as_deref()
            .context("database_url is not configured; set DATABASE_URL")?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to postgres")?;

        migrator().run(&pool).await.context("run database migrations")?;

        create_initial_admin_user(&config.admin_email, config.admin_password.as_deref(), &pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("staffctl listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

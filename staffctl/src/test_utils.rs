//! Shared helpers for tests.

use axum_test::TestServer;
use sqlx::PgPool;

use crate::{
    AppState, Config, build_router,
    api::models::users::Role,
    auth::password::{Argon2Params, hash_string_with_params},
    db::{
        handlers::{Employees, Repository, Users},
        models::{employees::EmployeeCreateDBRequest, users::UserCreateDBRequest},
    },
    types::LocationId,
};

/// Password given to accounts created by the test helpers.
pub const TEST_PASSWORD: &str = "correct-horse";

/// Cheap hashing parameters so tests don't burn CPU on argon2.
fn test_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config {
        secret_key: Some("test-secret-key".to_string()),
        ..Default::default()
    };
    config.auth.session.cookie_secure = false;
    config.auth.password.argon2_memory_kib = 1024;
    config.auth.password.argon2_iterations = 1;
    config
}

pub async fn create_test_server(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    let router = build_router(&state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

pub async fn create_test_admin(pool: &PgPool, email: &str) {
    let mut conn = pool.acquire().await.unwrap();
    let mut users = Users::new(&mut conn);
    users
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            role: Role::Admin,
            password_hash: hash_string_with_params(TEST_PASSWORD, Some(test_params())).unwrap(),
        })
        .await
        .unwrap();
}

pub async fn create_test_employee(pool: &PgPool, email: &str, assigned: Option<LocationId>) {
    let mut conn = pool.acquire().await.unwrap();
    let mut employees = Employees::new(&mut conn);
    employees
        .create(&EmployeeCreateDBRequest {
            email: email.to_string(),
            name: "Test Employee".to_string(),
            assigned_location: assigned,
            password_hash: hash_string_with_params(TEST_PASSWORD, Some(test_params())).unwrap(),
        })
        .await
        .unwrap();
}

/// Log in and return the session cookie pair (`name=token`) for reuse on
/// later requests.
pub async fn login_with(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&serde_json::json!({"email": email, "password": password}))
        .await;
    response.assert_status_ok();

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login response is missing the session cookie")
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

pub async fn login(server: &TestServer, email: &str) -> String {
    login_with(server, email, TEST_PASSWORD).await
}

//! Helpers shared between the crate's test modules.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState,
    auth::AuthResponse,
    cause::Cause,
    database_id::{CauseId, DonationId, UserId},
    db::initialize,
    routing::build_router,
};

/// Create a test server backed by a freshly initialized in-memory database.
pub fn build_test_server() -> TestServer {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    initialize(&connection).expect("Could not initialize database");
    let state = AppState::new(connection, "42").expect("Could not create app state");

    TestServer::new(build_router(state))
}

/// Register a user through the API and return the auth response, including a
/// bearer token for authenticated requests.
pub async fn register_test_user(server: &TestServer, email: &str, password: &str) -> AuthResponse {
    let response = server
        .post("/api/users/register")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": password,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<AuthResponse>()
}

/// Create a cause through the API.
pub async fn create_test_cause(server: &TestServer, token: &str, title: &str) -> Cause {
    let response = server
        .post("/api/causes")
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "organization": "Helpers Inc",
            "description": "A very good cause",
            "image_url": "https://example.com/cause.jpg",
            "goal_amount": 1000.0,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Cause>()
}

/// Insert a cause directly into the database.
pub fn insert_test_cause(connection: &Connection, title: &str) -> CauseId {
    let now = OffsetDateTime::now_utc();

    connection
        .query_row(
            "INSERT INTO cause (title, organization, description, image_url, goal_amount, created_at, updated_at)
                VALUES (?1, 'Helpers Inc', 'A very good cause', 'https://example.com/cause.jpg', 1000.0, ?2, ?2)
                RETURNING id",
            (title, now),
            |row| row.get(0),
        )
        .expect("Could not insert cause")
}

/// Insert a user directly into the database, skipping password hashing.
pub fn insert_test_user(connection: &Connection, name: &str, email: &str) -> UserId {
    let now = OffsetDateTime::now_utc();

    connection
        .query_row(
            "INSERT INTO user (name, email, password_hash, created_at, updated_at)
                VALUES (?1, ?2, 'not-a-real-hash', ?3, ?3)
                RETURNING id",
            (name, email, now),
            |row| row.get(0),
        )
        .expect("Could not insert user")
}

/// Insert a donation directly into the database. This bypasses the ledger, so
/// the cause's raised amount is left untouched.
pub fn insert_test_donation(
    connection: &Connection,
    cause_id: CauseId,
    user_id: Option<UserId>,
    amount: f64,
    is_anonymous: bool,
) -> DonationId {
    let now = OffsetDateTime::now_utc();

    connection
        .query_row(
            "INSERT INTO donation (user_id, cause_id, amount, is_anonymous, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                RETURNING id",
            (user_id, cause_id, amount, is_anonymous, now),
            |row| row.get(0),
        )
        .expect("Could not insert donation")
}

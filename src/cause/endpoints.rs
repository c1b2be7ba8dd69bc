//! Route handlers for browsing and managing causes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{AppState, Error, auth::Claims, database_id::CauseId};

use super::core::{
    Cause, CauseInput, create_cause, delete_cause, get_all_causes, get_cause, get_featured_causes,
    update_cause,
};

/// A route handler for listing all causes.
pub async fn get_all_causes_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Cause>>, Error> {
    let connection = state.lock_connection()?;

    get_all_causes(&connection).map(Json)
}

/// A route handler for listing the featured causes.
pub async fn get_featured_causes_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Cause>>, Error> {
    let connection = state.lock_connection()?;

    get_featured_causes(&connection).map(Json)
}

/// A route handler for getting a cause by its database ID.
pub async fn get_cause_endpoint(
    State(state): State<AppState>,
    Path(cause_id): Path<CauseId>,
) -> Result<Json<Cause>, Error> {
    let connection = state.lock_connection()?;

    get_cause(cause_id, &connection).map(Json)
}

/// A route handler for creating a new cause.
pub async fn create_cause_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Json(input): Json<CauseInput>,
) -> Result<(StatusCode, Json<Cause>), Error> {
    let connection = state.lock_connection()?;

    create_cause(input, &connection).map(|cause| (StatusCode::CREATED, Json(cause)))
}

/// A route handler for updating a cause.
pub async fn update_cause_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(cause_id): Path<CauseId>,
    Json(input): Json<CauseInput>,
) -> Result<Json<Cause>, Error> {
    let connection = state.lock_connection()?;

    update_cause(cause_id, input, &connection).map(Json)
}

/// A route handler for deleting a cause.
pub async fn delete_cause_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(cause_id): Path<CauseId>,
) -> Result<StatusCode, Error> {
    let connection = state.lock_connection()?;

    delete_cause(cause_id, &connection).map(|_| StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        cause::Cause,
        test_utils::{build_test_server, create_test_cause, register_test_user},
    };

    #[tokio::test]
    async fn list_causes_is_public() {
        let server = build_test_server();

        let response = server.get("/api/causes").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Cause>>().len(), 0);
    }

    #[tokio::test]
    async fn create_cause_requires_auth() {
        let server = build_test_server();

        let response = server
            .post("/api/causes")
            .json(&json!({
                "title": "Clean Water",
                "organization": "Helpers Inc",
                "description": "A very good cause",
                "image_url": "https://example.com/cause.jpg",
                "goal_amount": 1000.0
            }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn create_then_get_cause() {
        let server = build_test_server();
        let auth = register_test_user(&server, "admin@example.com", "hunter22").await;

        let cause = create_test_cause(&server, &auth.token, "Clean Water").await;

        let response = server.get(&format!("/api/causes/{}", cause.id)).await;

        response.assert_status_ok();
        let got = response.json::<Cause>();
        assert_eq!(got.title, "Clean Water");
        assert_eq!(got.raised_amount, 0.0);
    }

    #[tokio::test]
    async fn create_cause_rejects_non_positive_goal() {
        let server = build_test_server();
        let auth = register_test_user(&server, "admin@example.com", "hunter22").await;

        let response = server
            .post("/api/causes")
            .authorization_bearer(&auth.token)
            .json(&json!({
                "title": "Clean Water",
                "organization": "Helpers Inc",
                "description": "A very good cause",
                "image_url": "https://example.com/cause.jpg",
                "goal_amount": -5.0
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn featured_causes_only_lists_featured() {
        let server = build_test_server();
        let auth = register_test_user(&server, "admin@example.com", "hunter22").await;
        create_test_cause(&server, &auth.token, "Plain").await;

        let created = server
            .post("/api/causes")
            .authorization_bearer(&auth.token)
            .json(&json!({
                "title": "Highlighted",
                "organization": "Helpers Inc",
                "description": "A very good cause",
                "image_url": "https://example.com/cause.jpg",
                "goal_amount": 1000.0,
                "featured": true
            }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);

        let response = server.get("/api/causes/featured").await;

        response.assert_status_ok();
        let causes = response.json::<Vec<Cause>>();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].title, "Highlighted");
    }
}

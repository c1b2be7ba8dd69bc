//! Route handlers for browsing and managing categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{AppState, Error, auth::Claims, database_id::CategoryId};

use super::core::{
    Category, CategoryInput, create_category, delete_category, get_all_categories, get_category,
    update_category,
};

/// A route handler for listing all categories.
pub async fn get_all_categories_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.lock_connection()?;

    get_all_categories(&connection).map(Json)
}

/// A route handler for getting a category by its database ID.
pub async fn get_category_endpoint(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = state.lock_connection()?;

    get_category(category_id, &connection).map(Json)
}

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let connection = state.lock_connection()?;

    create_category(input, &connection).map(|category| (StatusCode::CREATED, Json(category)))
}

/// A route handler for updating a category.
pub async fn update_category_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(category_id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, Error> {
    let connection = state.lock_connection()?;

    update_category(category_id, input, &connection).map(Json)
}

/// A route handler for deleting a category.
pub async fn delete_category_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = state.lock_connection()?;

    delete_category(category_id, &connection).map(|_| StatusCode::NO_CONTENT)
}

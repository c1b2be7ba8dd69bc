//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::database_id::CauseId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email or password used to log in did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token attached to the request was missing, malformed or
    /// expired.
    #[error("invalid auth token")]
    InvalidToken,

    /// An unexpected error occurred while signing a JWT.
    #[error("could not create auth token")]
    TokenCreation,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients receive a generic internal server error instead.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used during registration is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email used during registration already belongs to a user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The name used to create a category already exists in the database.
    #[error("the category name is already in use")]
    DuplicateCategoryName,

    /// A donation or cause was given an amount of zero or less.
    ///
    /// Donations record money actually given and causes must aim for a real
    /// target, so amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// The cause ID used to create a donation did not match an existing cause.
    #[error("the cause ID {0} does not refer to an existing cause")]
    CauseNotFound(CauseId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("category.name") => Error::DuplicateCategoryName,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_owned())
            }
            Error::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid auth token".to_owned()),
            Error::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                format!("\"{email}\" is not a valid email address"),
            ),
            Error::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "Email already in use".to_owned())
            }
            Error::DuplicateCategoryName => {
                (StatusCode::BAD_REQUEST, "Category name already in use".to_owned())
            }
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                format!("Amount must be positive, got {amount}"),
            ),
            Error::CauseNotFound(cause_id) => (
                StatusCode::NOT_FOUND,
                format!("Could not find a cause with the ID {cause_id}"),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "The requested resource could not be found".to_owned(),
            ),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

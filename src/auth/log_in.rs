//! The log-in endpoint that exchanges credentials for an auth token.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    user::{User, get_user_by_email},
};

use super::token::encode_jwt;

/// The credentials entered during log-in.
#[derive(Debug, Deserialize, Serialize)]
pub struct Credentials {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The response to a successful registration or log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The registered or signed-in user.
    pub user: User,
    /// A signed auth token for the user.
    pub token: String,
}

/// A route handler for logging in with an email and password.
///
/// # Errors
/// Returns an [Error::InvalidCredentials] if the email does not belong to a
/// registered user or the password does not match.
pub async fn log_in_endpoint(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, Error> {
    let user = {
        let connection = state.lock_connection()?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let password_is_correct =
        bcrypt::verify(&credentials.password, &user.password_hash).map_err(|error| {
            tracing::error!("Error verifying password: {}", error);
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_jwt(
        user.id,
        &user.email,
        state.token_duration,
        &state.jwt_keys.encoding_key,
    )?;

    Ok(Json(AuthResponse { user, token }))
}

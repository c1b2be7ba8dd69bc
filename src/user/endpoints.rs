//! Route handlers for registering an account and fetching the signed-in user.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{AuthResponse, Claims, encode_jwt},
    database_id::UserId,
};

use super::core::{NewUser, ProfileInput, Role, User, create_user, get_user_by_id, update_user};

/// The data entered during registration.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    /// The display name for the new account.
    pub name: String,
    /// The email address for the new account.
    pub email: String,
    /// The plain-text password for the new account, hashed before storage.
    pub password: String,
}

/// A route handler for registering a new user account.
///
/// On success the new user is returned along with a signed auth token, so the
/// client does not need a separate log-in round trip.
///
/// # Errors
/// Returns an [Error::InvalidEmail] if the email is not a valid address, an
/// [Error::DuplicateEmail] if the email is already registered, or an
/// [Error::HashingError] if the password could not be hashed.
pub async fn register_endpoint(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    let email = EmailAddress::from_str(&input.email)
        .map_err(|_| Error::InvalidEmail(input.email.clone()))?;

    let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST).map_err(|error| {
        tracing::error!("Error hashing password: {}", error);
        Error::HashingError(error.to_string())
    })?;

    let user = {
        let connection = state.lock_connection()?;

        create_user(
            NewUser {
                name: input.name,
                email: email.to_string(),
                password_hash,
                role: Role::User,
            },
            &connection,
        )?
    };

    let token = encode_jwt(
        user.id,
        &user.email,
        state.token_duration,
        &state.jwt_keys.encoding_key,
    )?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// A route handler for getting the signed-in user's account.
///
/// # Errors
/// Returns an [Error::NotFound] if the account behind the token has been
/// deleted.
pub async fn get_me_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<User>, Error> {
    let connection = state.lock_connection()?;

    get_user_by_id(claims.sub, &connection).map(Json)
}

/// A route handler for updating the signed-in user's profile.
///
/// # Errors
/// Returns an [Error::NotFound] if the account behind the token has been
/// deleted.
pub async fn update_me_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(input): Json<ProfileInput>,
) -> Result<Json<User>, Error> {
    let connection = state.lock_connection()?;

    update_user(claims.sub, input, &connection).map(Json)
}

/// A route handler for getting a user account by its database ID.
///
/// # Errors
/// Returns an [Error::NotFound] if `user_id` does not refer to a registered
/// user.
pub async fn get_user_endpoint(
    State(state): State<AppState>,
    _claims: Claims,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>, Error> {
    let connection = state.lock_connection()?;

    get_user_by_id(user_id, &connection).map(Json)
}

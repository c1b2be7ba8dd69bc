//! JWT claims and the extractors that pull them out of the `Authorization`
//! header.

use std::convert::Infallible;

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, database_id::UserId, state::JwtKeys};

/// How long an issued auth token stays valid.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserId,
    /// The email address of the user the token was issued to.
    pub email: String,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

/// Sign a token for the user with the given ID and email.
///
/// # Errors
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_jwt(
    user_id: UserId,
    email: &str,
    token_duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        email: email.to_owned(),
        exp: (now + token_duration).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Could not sign auth token: {}", error);
        Error::TokenCreation
    })
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let jwt_keys = JwtKeys::from_ref(state);

        decode_jwt(bearer.token(), &jwt_keys.decoding_key)
    }
}

/// Claims for routes that work with or without authentication.
///
/// Donation creation attributes the donation to the signed-in user when a
/// valid token is attached, and records an unattributed donation otherwise. A
/// missing or invalid token is therefore not a rejection here.
pub struct OptionalClaims(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalClaims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Claims::from_request_parts(parts, state).await.ok()))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use time::Duration;

    use crate::Error;

    use super::{DEFAULT_TOKEN_DURATION, decode_jwt, encode_jwt};

    fn get_test_keys() -> (EncodingKey, DecodingKey) {
        let secret = "42";

        (
            EncodingKey::from_secret(secret.as_ref()),
            DecodingKey::from_secret(secret.as_ref()),
        )
    }

    #[test]
    fn decode_jwt_gives_back_user_id_and_email() {
        let (encoding_key, decoding_key) = get_test_keys();
        let token = encode_jwt(7, "foo@bar.baz", DEFAULT_TOKEN_DURATION, &encoding_key)
            .expect("Could not sign token");

        let claims = decode_jwt(&token, &decoding_key).expect("Could not decode token");

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "foo@bar.baz");
    }

    #[test]
    fn decode_jwt_rejects_expired_token() {
        let (encoding_key, decoding_key) = get_test_keys();
        let token = encode_jwt(7, "foo@bar.baz", Duration::hours(-1), &encoding_key)
            .expect("Could not sign token");

        let result = decode_jwt(&token, &decoding_key);

        assert_eq!(result.unwrap_err(), Error::InvalidToken);
    }

    #[test]
    fn decode_jwt_rejects_token_signed_with_other_key() {
        let (encoding_key, _) = get_test_keys();
        let other_decoding_key = DecodingKey::from_secret("not 42".as_ref());
        let token = encode_jwt(7, "foo@bar.baz", DEFAULT_TOKEN_DURATION, &encoding_key)
            .expect("Could not sign token");

        let result = decode_jwt(&token, &other_decoding_key);

        assert_eq!(result.unwrap_err(), Error::InvalidToken);
    }
}

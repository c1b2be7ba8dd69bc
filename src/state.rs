//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::Duration;

use crate::{Error, auth::DEFAULT_TOKEN_DURATION, donation::DonationSchema};

/// The keys used for signing and verifying auth tokens.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key for signing new tokens.
    pub encoding_key: EncodingKey,
    /// The key for verifying tokens attached to requests.
    pub decoding_key: DecodingKey,
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection shared between request handlers.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys used for signing and verifying auth tokens.
    pub jwt_keys: JwtKeys,
    /// The duration for which issued auth tokens are valid.
    pub token_duration: Duration,
    /// The donation table capabilities detected at startup.
    pub donation_schema: DonationSchema,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// The database behind `connection` must have been initialized with
    /// [crate::db::initialize] first, since the donation schema capabilities
    /// are detected here and cached for the lifetime of the server.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the schema probe fails.
    pub fn new(connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        let donation_schema = DonationSchema::detect(&connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(connection)),
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            },
            token_duration: DEFAULT_TOKEN_DURATION,
            donation_schema,
        })
    }

    /// Acquire the lock for the database connection.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseLockError] if the lock has been poisoned by
    /// a panicking thread.
    pub fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_keys.clone()
    }
}

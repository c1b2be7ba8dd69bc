//! Issues and validates the JSON Web Tokens used to authenticate requests.

mod log_in;
mod token;

pub use log_in::{AuthResponse, Credentials, log_in_endpoint};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, OptionalClaims, encode_jwt};

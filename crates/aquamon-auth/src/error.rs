//! Authentication error types.

use aquamon_core::error::AquamonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    EmailTaken,

    #[error("no user is currently signed in")]
    NotSignedIn,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AquamonError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::EmailTaken | AuthError::NotSignedIn => {
                AquamonError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => AquamonError::Crypto(msg),
        }
    }
}

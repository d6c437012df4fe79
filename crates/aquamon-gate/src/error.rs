//! Access gate error types.

use aquamon_core::error::AquamonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("a secret is required to enable protection")]
    SecretRequired,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("obfuscation error: {0}")]
    Obfuscation(String),
}

impl From<GateError> for AquamonError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::SecretRequired => AquamonError::Validation {
                message: err.to_string(),
            },
            GateError::PermissionDenied(reason) => AquamonError::AuthorizationDenied { reason },
            GateError::Obfuscation(msg) => AquamonError::Crypto(msg),
        }
    }
}

//! Service-layer error types.

use agendo_core::error::AgendoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("actor is not permitted to perform this operation")]
    NotPermitted,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<ServiceError> for AgendoError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotPermitted => AgendoError::AuthorizationDenied {
                reason: err.to_string(),
            },
            ServiceError::Crypto(msg) => AgendoError::Crypto(msg),
        }
    }
}

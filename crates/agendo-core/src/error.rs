//! Error types for the Agendo system.

use thiserror::Error;

use crate::validate::Violation;

#[derive(Debug, Error)]
pub enum AgendoError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation failed: {violations:?}")]
    Validation { violations: Vec<Violation> },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Tenant context missing or invalid")]
    TenantContext,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgendoResult<T> = Result<T, AgendoError>;

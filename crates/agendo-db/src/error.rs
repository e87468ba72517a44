//! Database-specific error types and conversions.

use agendo_core::error::AgendoError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for AgendoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgendoError::NotFound { entity, id },
            other => AgendoError::Database(other.to_string()),
        }
    }
}

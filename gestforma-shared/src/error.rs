//! Domain error type shared by all services.
//!
//! Services validate inputs and the existence of referenced entities before
//! mutating state, so callers normally see one of the typed variants below
//! rather than a raw store constraint violation. Store-level violations that
//! do surface (e.g. a racing duplicate email insert) are translated into
//! `Conflict` at the service boundary.

use thiserror::Error;

/// Result alias used throughout the domain services.
pub type DomainResult<T> = Result<T, DomainError>;

/// Unified domain error.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Bad input shape, missing required field, malformed dates.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity id does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Duplicate unique key, or a delete blocked by existing references.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credentials, inactive account, invalid or expired token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Role or ownership mismatch.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Anything else the store raises.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    /// Shorthand for the not-found variant.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// Translates a store error, mapping unique-constraint violations to
    /// `Conflict` with the given message and passing everything else through.
    pub fn from_sqlx(err: sqlx::Error, conflict_msg: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Conflict(conflict_msg.to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::Conflict(format!("operation blocked by existing references: {}", db))
            }
            _ => DomainError::Database(err),
        }
    }
}

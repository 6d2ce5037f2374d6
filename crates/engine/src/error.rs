//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a request fails validation (bad date,
//!   empty description, non-positive amount, ...).
//! - [`NotFound`] thrown when no expense exists for the requested id.
//! - [`Database`] thrown when the storage layer fails.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`NotFound`]: EngineError::NotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("expense with id={0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_contains_id() {
        assert_eq!(
            EngineError::NotFound(42).to_string(),
            "expense with id=42 not found"
        );
    }

    #[test]
    fn database_errors_compare_by_message() {
        let a = EngineError::from(DbErr::Custom("boom".to_string()));
        let b = EngineError::from(DbErr::Custom("boom".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, EngineError::NotFound(1));
    }
}

//! Store error types.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::MissingReference(detail),
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = StoreError::not_found("venue", 7);
        assert_eq!(err.to_string(), "venue 7 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_missing_reference() {
        let err = StoreError::MissingReference("fk_shows_artist_id".into());
        assert_eq!(
            err.to_string(),
            "referenced record does not exist: fk_shows_artist_id"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_db_error() {
        let err: StoreError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_error_source_database() {
        use std::error::Error;
        let err: StoreError = DbErr::Custom("boom".into()).into();
        assert!(err.source().is_some());
        assert!(StoreError::not_found("artist", 1).source().is_none());
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Record not found")]
    NotFound,

    #[error("Duplicate entry. This record already exists.")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => {
                DatabaseError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // Unique violation
                Some("23505") => DatabaseError::Duplicate,
                // Not-null violation
                Some("23502") => {
                    DatabaseError::InvalidInput("Required field is missing.".to_string())
                }
                // Foreign-key violation
                Some("23503") => DatabaseError::InvalidInput(
                    "Invalid reference. Related record does not exist.".to_string(),
                ),
                // String data right truncation (oversized column value)
                Some("22001") => {
                    DatabaseError::InvalidInput("Field value too large for column.".to_string())
                }
                _ => DatabaseError::Sqlx(err),
            },
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Connection-class failures that the access layer may retry transparently.
/// Anything else (constraint violations, bad SQL, row decode) must surface
/// immediately.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::NotFound));
    }

    #[test]
    fn pool_timeout_is_transient_and_maps_to_connection_error() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DatabaseError::ConnectionError(_)));
    }

    #[test]
    fn row_not_found_is_not_transient() {
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }
}

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    #[error("Database query failed: {0}")]
    QueryError(sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

/// Classifies driver errors so callers can tell constraint rejections apart
/// from genuine failures without inspecting SQLSTATE codes themselves.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { constraint },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { constraint },
                    ErrorKind::CheckViolation => DbError::CheckViolation { constraint },
                    _ => DbError::QueryError(sqlx::Error::Database(db_err)),
                }
            }
            other => DbError::QueryError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_maps_to_not_found() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound
        ));
    }

    #[test]
    fn pool_errors_stay_query_errors() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::QueryError(_)));
    }

    #[test]
    fn constraint_name_is_in_the_message() {
        let err = DbError::UniqueViolation {
            constraint: "students_email_key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: students_email_key"
        );
    }
}

use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Establishes a connection pool to the PostgreSQL database.
///
/// Each request borrows a connection (or a transaction on one) from this pool
/// and hands it back when the borrow is dropped, whether the work succeeded or not.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database.url is empty; set it in the config file or via DATABASE_URL.".to_string(),
        ));
    }

    let pool = pool_options(settings).connect(&settings.url).await?;

    Ok(pool)
}

/// Builds a pool without opening any connection until the first query.
///
/// Used by tests that exercise code paths which must never reach storage.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    Ok(pool_options(settings).connect_lazy(&settings.url)?)
}

fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
}

/// A utility function to run database migrations automatically.
///
/// Migrations are embedded at compile time, so the binary carries its own schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_url_is_a_settings_error() {
        let settings = DatabaseSettings {
            url: "  ".to_string(),
            ..DatabaseSettings::default()
        };
        let err = connect(&settings).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionConfigError(_)));
        assert_eq!(
            err.to_string(),
            "Invalid database connection settings: database.url is empty; set it in the config file or via DATABASE_URL."
        );
    }
}

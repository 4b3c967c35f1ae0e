use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is the only long-lived resource of the service: it is created once
/// and handed to `DbRepository`. A request that cannot get a connection within
/// `acquire_timeout` fails instead of queueing forever.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL must be set.".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect(&settings.url)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        acquire_timeout = ?settings.acquire_timeout(),
        "Database connection pool ready."
    );
    Ok(pool)
}

use chrono::{DateTime, SecondsFormat, Utc};
use log::LevelFilter;
use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions},
    AnyPool, ConnectOptions, Executor,
};
use std::str::FromStr;

use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};

mod articles;
mod tags;
mod users;

const SQLITE_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode = WAL",
    "PRAGMA busy_timeout = 5000",
    "PRAGMA synchronous = NORMAL",
    "PRAGMA foreign_keys = ON",
];

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: AnyPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();

        let connect_options = AnyConnectOptions::from_str(database_url)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, std::time::Duration::from_secs(1));

        let is_sqlite = database_url.starts_with("sqlite");

        // Pragmas are per connection, so they run on every pooled connection
        let pool = AnyPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    if is_sqlite {
                        for pragma in SQLITE_PRAGMAS {
                            (&mut *conn).execute(*pragma).await?;
                        }
                    }
                    Ok(())
                })
            })
            .connect_with(connect_options)
            .await?;

        tracing::info!("Database pool ready");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await
    }

    /// One round-trip, used by the health endpoint.
    pub async fn ping(&self) -> ApiResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

/// Current time in the stored format (RFC 3339, millisecond precision, UTC).
/// Fixed width keeps lexical and chronological order identical.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(value: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ApiError::Internal(format!("Invalid stored timestamp '{}': {}", value, e)))
}

/// Message of a unique-constraint violation, if that is what `err` is.
pub(crate) fn unique_violation_message(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation() || db_err.message().contains("UNIQUE") =>
        {
            Some(db_err.message().to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip_keeps_millis() {
        let stored = now_timestamp();
        assert!(stored.ends_with('Z'));
        assert_eq!(stored.len(), "2024-01-02T03:04:05.678Z".len());

        let parsed = parse_timestamp(&stored).unwrap();
        assert_eq!(
            parsed.to_rfc3339_opts(SecondsFormat::Millis, true),
            stored
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn test_row_not_found_is_not_a_unique_violation() {
        assert!(unique_violation_message(&sqlx::Error::RowNotFound).is_none());
    }
}

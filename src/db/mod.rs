mod clients;
mod enrollments;
mod programs;

use std::str::FromStr;

use anyhow::Result;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::RegistryResult;

static POSTGRES_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Database connection pool
///
/// Both backends accept the same `$n` placeholder queries, so every store
/// operation is written once and dispatched with [`with_pool!`].
#[derive(Clone, Debug)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Run `$body` against whichever pool backs `$db`
macro_rules! with_pool {
    ($db:expr, |$pool:ident| $body:expr) => {
        match $db {
            $crate::db::Database::Postgres($pool) => $body,
            $crate::db::Database::Sqlite($pool) => $body,
        }
    };
}
pub(crate) use with_pool;

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(settings: &DatabaseSettings, max_connections: u32) -> RegistryResult<Self> {
        match settings {
            DatabaseSettings::Url(url) => Self::connect_url(url, max_connections).await,
            DatabaseSettings::Postgres {
                host,
                port,
                user,
                password,
                name,
            } => {
                let options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(name);
                let pool = PgPoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(options)
                    .await?;
                Ok(Self::Postgres(pool))
            }
        }
    }

    /// Connect from a `postgres://` or `sqlite:` URL
    pub async fn connect_url(url: &str, max_connections: u32) -> RegistryResult<Self> {
        if url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(url)?
                .create_if_missing(true)
                .foreign_keys(true);

            // An in-memory database lives only as long as its connection
            let pool = if url.contains(":memory:") || url.contains("mode=memory") {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?
            } else {
                SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(options)
                    .await?
            };
            Ok(Self::Sqlite(pool))
        } else {
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await?;
            Ok(Self::Postgres(pool))
        }
    }

    /// Create or upgrade the schema
    pub async fn migrate(&self) -> RegistryResult<()> {
        match self {
            Self::Postgres(pool) => POSTGRES_MIGRATIONS.run(pool).await?,
            Self::Sqlite(pool) => SQLITE_MIGRATIONS.run(pool).await?,
        }
        Ok(())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "PostgreSQL",
            Self::Sqlite(_) => "SQLite",
        }
    }

    /// Release every pooled connection
    pub async fn close(&self) {
        with_pool!(self, |pool| pool.close().await)
    }
}

/// Initialize the database connection pool and bring the schema up to date
pub async fn init(config: &Config) -> Result<Database> {
    let settings = config.database_settings()?;
    let db = Database::new(&settings, config.db_max_connections).await?;
    info!(backend = db.backend_name(), "database connection established");

    db.migrate().await?;
    info!("database schema is up to date");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_schema() {
        let db = Database::connect_url("sqlite::memory:", 5).await.unwrap();
        db.migrate().await.unwrap();
        assert_eq!(db.backend_name(), "SQLite");

        let Database::Sqlite(pool) = &db else {
            panic!("expected an SQLite pool");
        };
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap();

        assert!(tables.contains(&"health_programs".to_string()));
        assert!(tables.contains(&"clients".to_string()));
        assert!(tables.contains(&"client_programs".to_string()));
    }
}

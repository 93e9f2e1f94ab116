use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;

/// Open the connection pool. Foreign keys are enforced on every connection;
/// WAL keeps concurrent readers out of the writers' way.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::Connectivity)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .map_err(AppError::Connectivity)?;

    info!(%database_url, "database pool opened");
    Ok(db)
}

const CREATE_USERS: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER',
    token TEXT
)";

const CREATE_DOACOES: &str = "\
CREATE TABLE IF NOT EXISTS doacoes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    descricao TEXT NOT NULL,
    quantidade TEXT,
    destino TEXT,
    recebido BOOLEAN DEFAULT FALSE,
    userId INTEGER NOT NULL,
    FOREIGN KEY (userId) REFERENCES users(id) ON DELETE RESTRICT
)";

/// Idempotent schema bootstrap, run once at startup.
pub async fn init_schema(db: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(CREATE_USERS).execute(db).await?;
    sqlx::query(CREATE_DOACOES).execute(db).await?;
    Ok(())
}

/// Fresh single-connection in-memory database with the schema applied.
/// One connection is mandatory: every pooled connection to sqlite::memory:
/// would otherwise see its own empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("in-memory sqlite url")
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    init_schema(&db).await.expect("bootstrap schema");
    db
}

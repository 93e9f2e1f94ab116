use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = db::connect(&config.database_url).await?;
        Ok(Self { db })
    }
}

#[cfg(test)]
impl AppState {
    /// State over a fresh in-memory database, for handler tests.
    pub async fn test() -> Self {
        Self {
            db: db::test_pool().await,
        }
    }
}

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // Any sqlite: URL works, including sqlite::memory: for scratch runs.
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:ong.db".into());
        Ok(Self { database_url })
    }
}

//! Process configuration, read once from the environment at startup.

use crate::db::DbConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub db_connect_timeout_secs: u64,
    pub db_max_pool_size: u32,
}

/// Which database variables were present at startup. Values are never kept
/// here, so this is safe to render in diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvPresence {
    pub database_url: bool,
    pub database_name: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as
    /// unset; unparsable numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: get("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME"),
            db_connect_timeout_secs: get("DB_CONNECT_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            db_max_pool_size: get("DB_MAX_POOL_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection settings, or `None` unless both URL and name are set.
    pub fn db_config(&self) -> Option<DbConfig> {
        let url = self.database_url.clone()?;
        let name = self.database_name.clone()?;
        Some(DbConfig {
            url,
            name,
            connect_timeout_secs: self.db_connect_timeout_secs,
            max_pool_size: self.db_max_pool_size,
        })
    }

    pub fn env_presence(&self) -> EnvPresence {
        EnvPresence {
            database_url: self.database_url.is_some(),
            database_name: self.database_name.is_some(),
        }
    }
}

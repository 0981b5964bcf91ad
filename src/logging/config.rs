//! Logging settings, read from the environment.

const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub environment: String,
    /// Level applied to this crate when `RUST_LOG` is not set.
    pub level: String,
    pub directory: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let level = lookup("LOG_LEVEL").unwrap_or_else(|| {
            if environment == "production" {
                "info".to_string()
            } else {
                "debug".to_string()
            }
        });
        let directory = lookup("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());

        Self {
            environment,
            level,
            directory,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Filter directive used when `RUST_LOG` is absent.
    pub fn default_directive(&self) -> String {
        format!(
            "{}={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME"),
            self.level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults_to_debug() {
        let config = LogConfig::from_lookup(|_| None);
        assert!(!config.is_production());
        assert_eq!(config.level, "debug");
        assert_eq!(config.directory, "logs");
        assert!(config.default_directive().starts_with("site_backend=debug"));
    }

    #[test]
    fn test_production_defaults_to_info() {
        let config = LogConfig::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("production".to_string()),
            _ => None,
        });
        assert!(config.is_production());
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_explicit_level_wins() {
        let config = LogConfig::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("production".to_string()),
            "LOG_LEVEL" => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(config.level, "warn");
    }
}

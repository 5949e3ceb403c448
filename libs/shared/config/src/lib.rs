use std::env;
use tracing::warn;

pub const DEFAULT_DATABASE_PATH: &str = "clinic.db";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file backing the patient and appointment tables. `:memory:` keeps
    /// everything in process.
    pub database_path: String,
    pub bind_address: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_PATH not set, using default {}", DEFAULT_DATABASE_PATH);
                    DEFAULT_DATABASE_PATH.to_string()
                }),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default {}", DEFAULT_BIND_ADDRESS);
                    DEFAULT_BIND_ADDRESS.to_string()
                }),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_config() {
        let config = AppConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn test_default_points_at_file() {
        let config = AppConfig::default();
        assert!(!config.is_in_memory());
        assert_eq!(config.database_path, "clinic.db");
    }
}

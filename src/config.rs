use std::env;

/// Runtime configuration with environment overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen address
    pub bind_addr: String,
    /// SQLite URL; `mode=rwc` creates the database file on first run
    pub database_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: "sqlite://data-dev.db?mode=rwc".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
        }
    }
}

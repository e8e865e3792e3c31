//! Editor configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.
//! Library users that do not read the environment start from `Config::default()`.

use super::canvas::Database;
use super::layout::{SIZE_CANVAS_HEIGHT, SIZE_CANVAS_WIDTH};

pub const DEFAULT_HISTORY_LIMIT: usize = 2048;

/// Errors reading configuration values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidInteger { name: &'static str, value: String },

    #[error("{name} must be a positive number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("unknown database {value:?}")]
    UnknownDatabase { value: String },
}

/// Editor configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of undo batches kept
    /// Env: ERDKIT_HISTORY_LIMIT
    pub history_limit: usize,

    /// Initial canvas size of a new document
    /// Env: ERDKIT_CANVAS_WIDTH, ERDKIT_CANVAS_HEIGHT
    pub canvas_width: f64,
    pub canvas_height: f64,

    /// Dialect of a new document and of the CLI when none is given
    /// Env: ERDKIT_DATABASE (mysql, mariadb, postgresql, oracle, mssql, sqlite)
    pub database: Database,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            canvas_width: SIZE_CANVAS_WIDTH,
            canvas_height: SIZE_CANVAS_HEIGHT,
            database: Database::default(),
        }
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env)
    }

    /// Build a configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("ERDKIT_HISTORY_LIMIT") {
            config.history_limit =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidInteger {
                        name: "ERDKIT_HISTORY_LIMIT",
                        value,
                    })?;
        }
        if let Some(value) = lookup("ERDKIT_CANVAS_WIDTH") {
            config.canvas_width = parse_size("ERDKIT_CANVAS_WIDTH", value)?;
        }
        if let Some(value) = lookup("ERDKIT_CANVAS_HEIGHT") {
            config.canvas_height = parse_size("ERDKIT_CANVAS_HEIGHT", value)?;
        }
        if let Some(value) = lookup("ERDKIT_DATABASE") {
            config.database =
                Database::from_str(value.trim()).ok_or(ConfigError::UnknownDatabase { value })?;
        }

        Ok(config)
    }

    /// Check if undo history is enabled
    pub fn has_history(&self) -> bool {
        self.history_limit > 0
    }
}

fn parse_size(name: &'static str, value: String) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(size) if size > 0.0 && size.is_finite() => Ok(size),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    // ========================================================================
    // Config Struct Tests (no env var dependencies - thread safe)
    // ========================================================================

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.history_limit, 2048);
        assert_eq!(config.canvas_width, 2000.0);
        assert_eq!(config.database, Database::MySQL);
        assert!(config.has_history());
    }

    #[test]
    fn test_config_with_all_fields() {
        let config = Config::from_lookup(lookup(&[
            ("ERDKIT_HISTORY_LIMIT", "10"),
            ("ERDKIT_CANVAS_WIDTH", "4000"),
            ("ERDKIT_CANVAS_HEIGHT", "3000.5"),
            ("ERDKIT_DATABASE", "postgresql"),
        ]))
        .unwrap();

        assert_eq!(config.history_limit, 10);
        assert_eq!(config.canvas_width, 4000.0);
        assert_eq!(config.canvas_height, 3000.5);
        assert_eq!(config.database, Database::PostgreSQL);
    }

    #[test]
    fn test_config_with_partial_fields() {
        let config = Config::from_lookup(lookup(&[("ERDKIT_DATABASE", "SQLite")])).unwrap();
        assert_eq!(config.database, Database::SQLite);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_zero_history_disables_undo() {
        let config = Config::from_lookup(lookup(&[("ERDKIT_HISTORY_LIMIT", "0")])).unwrap();
        assert!(!config.has_history());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("ERDKIT_HISTORY_LIMIT", "-1")])),
            Err(ConfigError::InvalidInteger { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("ERDKIT_CANVAS_WIDTH", "wide")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("ERDKIT_DATABASE", "db2")])),
            Err(ConfigError::UnknownDatabase { .. })
        ));
    }

    #[test]
    fn test_config_debug() {
        let debug_str = format!("{:?}", Config::default());
        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("history_limit"));
    }
}

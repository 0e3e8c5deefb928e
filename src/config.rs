//! Runtime configuration
//!
//! Read once from the environment in `main` and passed down explicitly.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Selects the store backend
pub const STORE_ENV: &str = "NUTRITRACK_STORE";
/// Overrides the SQLite database location
pub const DATABASE_PATH_ENV: &str = "NUTRITRACK_DATABASE_PATH";
/// Default tracing directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "nutritrack=info";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown store backend '{0}' (expected 'sqlite' or 'memory')")]
    UnknownStore(String),
}

/// Which persistence backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownStore(s.to_string())),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup(STORE_ENV) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => StoreBackend::default(),
        };

        let database_path = lookup(DATABASE_PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        Ok(Self { store, database_path })
    }
}

/// `<project>/data/nutritrack.db`, resolved from the executable location
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutritrack.db");
    path
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
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert!(config.database_path.ends_with("data/nutritrack.db"));
    }

    #[test]
    fn test_memory_backend() {
        let config = AppConfig::from_lookup(lookup(&[(STORE_ENV, "Memory")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn test_unknown_backend() {
        let result = AppConfig::from_lookup(lookup(&[(STORE_ENV, "postgres")]));
        assert!(matches!(result, Err(ConfigError::UnknownStore(_))));
    }

    #[test]
    fn test_database_path_override() {
        let config = AppConfig::from_lookup(lookup(&[(DATABASE_PATH_ENV, "/tmp/meals.db")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/meals.db"));
    }
}

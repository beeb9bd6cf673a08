//! Environment-driven configuration.
//!
//! Every key has a default so the service starts against a local MySQL
//! without any setup. `main` loads `.env` before calling [`Config::from_env`].

use crate::infrastructure::security::HashCost;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: String::new(),
            name: "StudyManagementDB".to_string(),
            port: 3306,
            max_connections: 10,
            run_migrations: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub hash_cost: HashCost,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to
    /// defaults; set-but-unparseable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.database.host),
            user: lookup("DB_USER").unwrap_or(defaults.database.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.database.password),
            name: lookup("DB_NAME").unwrap_or(defaults.database.name),
            port: parsed(&lookup, "DB_PORT", defaults.database.port)?,
            max_connections: parsed(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.database.max_connections,
            )?,
            run_migrations: flag(&lookup, "DB_RUN_MIGRATIONS", defaults.database.run_migrations)?,
        };

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.server.cors_allowed_origins,
        };

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.server.host),
            port: parsed(&lookup, "PORT", defaults.server.port)?,
            cors_allowed_origins,
        };

        let hash_cost = HashCost {
            memory_kib: parsed(&lookup, "ARGON2_MEMORY_KIB", defaults.hash_cost.memory_kib)?,
            iterations: parsed(&lookup, "ARGON2_ITERATIONS", defaults.hash_cost.iterations)?,
            parallelism: parsed(&lookup, "ARGON2_PARALLELISM", defaults.hash_cost.parallelism)?,
        };

        Ok(Config {
            database,
            server,
            hash_cost,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(default),
    }
}

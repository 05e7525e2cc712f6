use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Empty outside production selects the in-memory store
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    pub log_format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown LOG_FORMAT: {}", other)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3333,
            database_url: String::new(),
            max_connections: 10,
            min_connections: 1,
            request_timeout: 30,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let database_url = resolve_database_url(&environment, env::var("DATABASE_URL").ok())?;

        Ok(Config {
            environment,
            port: parse_or("PORT", defaults.port)?,
            database_url,
            max_connections: parse_or("MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or("MIN_CONNECTIONS", defaults.min_connections)?,
            request_timeout: parse_or("REQUEST_TIMEOUT", defaults.request_timeout)?,
            log_format: parse_or("LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_url.is_empty()
    }
}

/// DATABASE_URL is mandatory in production; elsewhere an unset or blank value is allowed
fn resolve_database_url(environment: &str, raw: Option<String>) -> Result<String> {
    match raw.map(|url| url.trim().to_string()) {
        Some(url) if !url.is_empty() => Ok(url),
        _ if environment == "production" => Err(anyhow::anyhow!(
            "DATABASE_URL environment variable is required in production"
        )),
        _ => Ok(String::new()),
    }
}

/// Read an optional variable, failing loudly when it is set but unparsable
fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

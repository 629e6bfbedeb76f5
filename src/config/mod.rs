//! Configuration loading from the process environment

use crate::core::error::ConfigError;
use std::collections::HashMap;

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed to call the API from a browser
pub const ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://plantify-client.vercel.app",
];

/// Runtime configuration for the API process
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// MongoDB connection string (`MONGODB_URI`, required)
    pub mongodb_uri: String,

    /// Database holding the catalog (`MONGODB_DB`)
    pub database: String,

    /// Collection holding plant records (`PLANTS_COLLECTION`)
    pub collection: String,

    /// Bind address (`HOST`)
    pub host: String,

    /// Listening port (`PORT`)
    pub port: u16,

    /// CORS allow-list
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key/value map
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mongodb_uri = lookup("MONGODB_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar {
                name: "MONGODB_URI",
            })?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar {
                    name: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            mongodb_uri,
            database: lookup("MONGODB_DB").unwrap_or_else(|| "plantify".to_string()),
            collection: lookup("PLANTS_COLLECTION").unwrap_or_else(|| "plants".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            allowed_origins: ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        })
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

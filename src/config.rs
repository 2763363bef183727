use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::transfer::composer::LetterSettings;

const DEFAULT_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
}

/// Server settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Organization shown on generated templates
    pub organization_name: String,
    /// City printed on the date line
    pub issue_city: String,
    /// When set, every generated order is also written here
    pub export_dir: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = LetterSettings::default();

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { key: "PORT", value })?,
            None => 8080,
        };

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            organization_name: get("ORGANIZATION_NAME").unwrap_or(defaults.organization),
            issue_city: get("ISSUE_CITY").unwrap_or(defaults.city),
            export_dir: get("EXPORT_DIR").map(PathBuf::from),
            allowed_origins,
        })
    }

    pub fn letter_settings(&self) -> LetterSettings {
        LetterSettings {
            city: self.issue_city.clone(),
            organization: self.organization_name.clone(),
        }
    }
}

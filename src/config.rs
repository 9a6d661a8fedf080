//! Configuration loader and validator for the dashboard client.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::Role;

/// Environment variable that overrides `api.token` when set and non-empty.
pub const TOKEN_ENV: &str = "CONTENT_DASH_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    pub session: Session,
    #[serde(default)]
    pub display: Display,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Who is calling. The role gates admin-only reads such as the client list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    #[serde(default)]
    pub client_id: Option<i64>,
}

/// Rendering knobs for the terminal views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Display {
    #[serde(default = "default_max_per_day")]
    pub max_per_day: usize,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            max_per_day: default_max_per_day(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_per_day() -> usize {
    3
}

impl Config {
    /// Replace `api.token` with the value of [`TOKEN_ENV`] if it is set and not blank.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.api.token = token;
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session.role == Role::Admin
    }
}

/// Load configuration from a YAML file, apply env overrides and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    cfg.apply_env_overrides();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    if !(cfg.api.base_url.starts_with("http://") || cfg.api.base_url.starts_with("https://")) {
        return Err(ConfigError::Invalid("api.base_url must be an http(s) URL"));
    }
    if cfg.api.token.trim().is_empty() {
        return Err(ConfigError::Invalid("api.token must be non-empty"));
    }
    if cfg.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0"));
    }
    if cfg.display.max_per_day == 0 {
        return Err(ConfigError::Invalid("display.max_per_day must be > 0"));
    }
    Ok(())
}

/// Sample configuration printed by `init-config`.
pub fn example() -> &'static str {
    r#"api:
  base_url: "http://localhost:8000/"
  token: "YOUR_API_TOKEN"
  timeout_secs: 30

session:
  role: "ADMIN"
  client_id: null

display:
  max_per_day: 3
"#
}

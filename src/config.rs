use crate::constants::{APP_NAME, DEFAULT_API_URL, ENV_API_URL, ENV_LOG_DIR, ENV_LOG_LEVEL};
use crate::errors::{ChatError, ChatResult};
use reqwest::Url;
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
            log_dir: default_log_dir(),
        }
    }
}

/// Overrides read from the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub api_url: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var(ENV_API_URL),
            log_level: non_empty_var(ENV_LOG_LEVEL),
            log_dir: non_empty_var(ENV_LOG_DIR),
        }
    }
}

impl Config {
    /// Loads the configuration once at startup: defaults, then the optional
    /// config file, then environment overrides.
    pub fn load() -> ChatResult<Self> {
        let path = get_config_path();
        Self::load_from(path.as_deref(), EnvOverrides::from_env())
    }

    pub fn load_from(path: Option<&Path>, overrides: EnvOverrides) -> ChatResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let config_str = fs::read_to_string(path).map_err(|e| {
                    ChatError::config_error(format!("Failed to read config file: {}", e))
                })?;
                serde_json::from_str(&config_str).map_err(|e| {
                    ChatError::config_error(format!("Failed to parse config: {}", e))
                })?
            }
            _ => Config::default(),
        };

        if let Some(url) = overrides.api_url {
            config.api_url = url;
        }
        if let Some(level) = overrides.log_level {
            config.log_level = level;
        }
        if let Some(dir) = overrides.log_dir {
            config.log_dir = PathBuf::from(dir);
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Parsed base URL, guaranteed to end with `/` so relative joins keep any
    /// path prefix.
    pub fn base_url(&self) -> ChatResult<Url> {
        parse_base_url(&self.api_url)
    }
}

pub fn parse_base_url(raw: &str) -> ChatResult<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ChatError::config_error(format!("Invalid api_url '{}': {}", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ChatError::config_error(format!(
            "api_url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME).join("config.json"))
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn validate_config(config: &Config) -> ChatResult<()> {
    parse_base_url(&config.api_url)?;

    if config.log_level.trim().is_empty() {
        return Err(ChatError::config_error("log_level is required"));
    }

    Ok(())
}

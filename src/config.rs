//! Configuration management for sowgen
//!
//! Settings are loaded from environment variables with defaults.
//!
//! # Environment Variables
//!
//! - `SOWGEN_DATA_DIR`: Directory for takeoff, summary and document files -
//!   default: platform local data dir + "sowgen"
//! - `SOWGEN_STORE_URL`: Base URL of the PostgREST-style store - optional
//! - `SOWGEN_STORE_KEY`: API key for the store - optional
//! - `SOWGEN_REQUEST_TIMEOUT`: Store request timeout in seconds - default: "10"
//! - `SOWGEN_HOST`: HTTP bind host - default: "0.0.0.0"
//! - `SOWGEN_PORT`: HTTP bind port - default: "8001"
//! - `SOWGEN_LOG_LEVEL`: Logging level - default: "info"
//! - `SOWGEN_LOG_JSON`: Emit JSON logs (true|false) - default: "false"
//!
//! Without both a store URL and key the workflow runs without persistence.
//!
//! # Example
//!
//! ```no_run
//! use sowgen::SowgenConfig;
//!
//! let config = SowgenConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8001;
const APP_DIR_NAME: &str = "sowgen";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct SowgenConfig {
    /// Root for the takeoff/, sow/ and pdf/ directories
    pub data_dir: PathBuf,

    pub store_url: Option<String>,

    pub store_key: Option<String>,

    /// Store request timeout in seconds
    pub request_timeout_secs: u64,

    pub host: String,

    pub port: u16,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
}

impl Default for SowgenConfig {
    /// Loads from `SOWGEN_*` environment variables, falling back to defaults
    /// for anything missing or unparsable.
    fn default() -> Self {
        let data_dir = non_empty_var("SOWGEN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let request_timeout_secs = env::var("SOWGEN_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let port = env::var("SOWGEN_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let log_level = env::var("SOWGEN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("SOWGEN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            data_dir,
            store_url: non_empty_var("SOWGEN_STORE_URL"),
            store_key: non_empty_var("SOWGEN_STORE_KEY"),
            request_timeout_secs,
            host: non_empty_var("SOWGEN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_level,
            log_json,
        }
    }
}

impl SowgenConfig {
    /// Checks value ranges, the log level, and the store URL scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::ValidationFailed(
                "Port must be between 1 and 65535".to_string(),
            ));
        }

        if let Some(url) = &self.store_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ParseError {
                    field: "SOWGEN_STORE_URL".to_string(),
                    error: format!("'{}' is not an http(s) URL", url),
                });
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_configured(&self) -> bool {
        self.store_url.is_some() && self.store_key.is_some()
    }

    /// Display map for output formatting. The store key is masked.
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("data_dir".to_string(), self.data_dir.display().to_string());
        map.insert(
            "store_url".to_string(),
            self.store_url.clone().unwrap_or_else(|| "not configured".to_string()),
        );
        map.insert(
            "store_key".to_string(),
            match &self.store_key {
                Some(_) => "********".to_string(),
                None => "not configured".to_string(),
            },
        );
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("bind_address".to_string(), self.bind_address());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());

        map
    }
}

impl fmt::Display for SowgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sowgen Configuration:")?;
        writeln!(f, "  Data Dir: {}", self.data_dir.display())?;
        match &self.store_url {
            Some(url) => writeln!(f, "  Store: {}", url)?,
            None => writeln!(f, "  Store: not configured")?,
        }
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Bind Address: {}", self.bind_address())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

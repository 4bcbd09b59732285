use crate::error::{config_error, HoursResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default log filter when neither `RUST_LOG` nor `PICKUP_HOURS_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/pickup_hours.toml";

/// Contents of the optional configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Holidays appended when an encoded record lists none of its own
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// Main configuration structure for the command-line tool
#[derive(Debug, Clone)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Default holidays from the configuration file
    pub holidays: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pretty: true,
            holidays: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> HoursResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let log_filter =
            env::var("PICKUP_HOURS_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        let pretty = match env::var("PICKUP_HOURS_PRETTY") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| config_error(&format!("Invalid PICKUP_HOURS_PRETTY: {}", value)))?,
            Err(_) => true,
        };

        let path = env::var("PICKUP_HOURS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let file = Self::load_file(&path)?;

        Ok(Config {
            log_filter,
            pretty,
            holidays: file.holidays,
        })
    }

    /// Read the configuration file, treating a missing file as empty
    pub fn load_file(path: &Path) -> HoursResult<FileConfig> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse_file(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse the contents of a configuration file
    pub fn parse_file(content: &str) -> HoursResult<FileConfig> {
        toml::from_str(content)
            .map_err(|e| config_error(&format!("Invalid configuration file: {}", e)))
    }
}

/// Parse a boolean environment value
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

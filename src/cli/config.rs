// FILE: src/cli/config.rs

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};
use std::fs;

/// Optional settings file. Command-line flags win over every field.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub watch: Option<bool>,
    pub debounce_ms: Option<u64>,
    /// Shell command run after each pass that wrote output.
    pub exec: Option<String>,
    pub stats: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| RouteError::PathNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| RouteError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| RouteError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(RouteError::invalid_format(
            "Config file must be .json or .toml format",
        ));
    };
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path).await,
        Err(_) => {
            if tokio::fs::try_exists(DEFAULT_CONFIG_PATH).await? {
                load_from(DEFAULT_CONFIG_PATH).await
            } else {
                debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                Ok(Config::default())
            }
        }
    }
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| Error::config(format!("{}: {}", config_path.display(), e)))?;

    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty file deserializes to null, not an empty mapping
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

/// Validates that a log level string is valid
pub fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            Error::config(format!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            ))
        })?;
    Ok(())
}

//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] by reading a JSON document from disk.
//! Missing fields fall back to [`PowerConfig::default`]; the result is
//! validated before it is handed to the controller.

use std::path::PathBuf;

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::PowerConfig;
use crate::error::ConfigError;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse and validate a JSON document.
    pub fn parse(text: &str) -> Result<PowerConfig, ConfigError> {
        let config: PowerConfig =
            serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<PowerConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config = Self::parse(&text)?;
        info!("config loaded from {}", self.path.display());
        Ok(config)
    }
}

//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  Missing fields
//! take their defaults, a missing file yields [`MonitorConfig::default()`],
//! and every loaded value is range-checked before it reaches the service.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Config: {} not found, using defaults", self.path.display());
                return Ok(MonitorConfig::default());
            }
            Err(e) => {
                warn!("Config: cannot read {}: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let cfg: MonitorConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config: {} is not valid JSON: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;

        info!("Config: loaded {}", self.path.display());
        Ok(cfg)
    }
}

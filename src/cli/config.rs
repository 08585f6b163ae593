//! Configuration file
//!
//! Optional JSON file; every field has a default. When no `--config` is
//! given, `./radiohound.json` is read if it exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dtype::{CatalogEntry, ElementTypeRegistry};
use crate::observability::Event;
use crate::record::{RecordCodec, DEFAULT_EXTENSION};

use super::errors::{CliError, CliResult};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./radiohound.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Element-type catalog replacing the built-in one
    #[serde(default)]
    pub element_types: Option<Vec<CatalogEntry>>,

    /// Extension added to save targets without one (default "rh")
    #[serde(default = "default_extension")]
    pub default_extension: String,

    /// Root for `<version>/schema.json` (default ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            element_types: None,
            default_extension: default_extension(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        info!(event = %Event::ConfigLoaded, path = %path.display());
        Ok(config)
    }

    /// Explicit path, else the default file if present, else defaults
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::load(default)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> CliResult<()> {
        let ext = &self.default_extension;
        if ext.is_empty() || ext.contains('.') || ext.contains('/') || ext.contains('\\') {
            return Err(CliError::config_error(format!(
                "Invalid default_extension: '{}'. Must be a bare extension like 'rh'.",
                ext
            )));
        }

        if let Some(entries) = &self.element_types {
            if entries.is_empty() {
                return Err(CliError::config_error("element_types must not be empty"));
            }
        }

        Ok(())
    }

    /// Builds the element-type registry from `element_types` or the
    /// built-in catalog.
    pub fn registry(&self) -> CliResult<ElementTypeRegistry> {
        let registry = match &self.element_types {
            Some(entries) => ElementTypeRegistry::from_catalog(entries.iter().cloned())
                .map_err(|e| CliError::config_error(e.to_string()))?,
            None => ElementTypeRegistry::builtin(),
        };

        info!(
            event = %Event::RegistryLoaded,
            types = registry.len(),
            custom = self.element_types.is_some()
        );
        Ok(registry)
    }

    /// Record codec over this configuration's registry
    pub fn codec(&self) -> CliResult<RecordCodec> {
        Ok(RecordCodec::new(Arc::new(self.registry()?))
            .with_default_extension(self.default_extension.clone()))
    }
}

//! Configuration Loader
//!
//! Environment-aware YAML discovery and merging. The environment comes from
//! `GRIEVANCE_ENV` (default `development`); the config directory from
//! `GRIEVANCE_CONFIG_DIR` (default `./config`). The base `grievance.yaml` is
//! merged with an optional `grievance-{env}.yaml` overlay, overlay keys
//! winning per mapping entry.

use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::{ConfigResult, ConfigurationError};
use super::GrievanceConfig;

const ENV_VAR: &str = "GRIEVANCE_ENV";
const CONFIG_DIR_VAR: &str = "GRIEVANCE_CONFIG_DIR";
const BASE_FILE: &str = "grievance.yaml";

#[derive(Debug)]
pub struct ConfigManager {
    config: GrievanceConfig,
    environment: String,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection.
    pub fn load() -> ConfigResult<Self> {
        let dir = env::var(CONFIG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));
        Self::load_from_directory(&dir)
    }

    /// Load configuration from a specific directory. Missing files are not an
    /// error: sections fall back to their defaults.
    pub fn load_from_directory(dir: &Path) -> ConfigResult<Self> {
        let environment = detect_environment();

        let base = read_yaml(&dir.join(BASE_FILE))?;
        let overlay = read_yaml(&dir.join(format!("grievance-{environment}.yaml")))?;

        let merged = match (base, overlay) {
            (Some(base), Some(overlay)) => merge_values(base, overlay),
            (Some(base), None) => base,
            (None, Some(overlay)) => overlay,
            (None, None) => {
                warn!(
                    directory = %dir.display(),
                    environment = %environment,
                    "No configuration files found, using built-in defaults"
                );
                YamlValue::Mapping(Default::default())
            }
        };

        let config: GrievanceConfig = serde_yaml::from_value(merged).map_err(|source| {
            ConfigurationError::Parse {
                path: dir.join(BASE_FILE),
                source,
            }
        })?;

        validate(&config)?;

        debug!(
            environment = %environment,
            pool = config.database.pool,
            "Configuration loaded"
        );

        Ok(Self {
            config,
            environment,
        })
    }

    pub fn config(&self) -> &GrievanceConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

fn detect_environment() -> String {
    env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
}

fn read_yaml(path: &Path) -> ConfigResult<Option<YamlValue>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_yaml::from_str(&raw).map_err(|source| ConfigurationError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

/// Recursive mapping merge; overlay wins on scalar and sequence conflicts.
fn merge_values(base: YamlValue, overlay: YamlValue) -> YamlValue {
    match (base, overlay) {
        (YamlValue::Mapping(mut base_map), YamlValue::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            YamlValue::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

fn validate(config: &GrievanceConfig) -> ConfigResult<()> {
    if config.database.pool == 0 {
        return Err(ConfigurationError::Invalid(
            "database.pool must be at least 1".to_string(),
        ));
    }
    let threshold = config.workflow.default_warning_threshold;
    if !(1..=100).contains(&threshold) {
        return Err(ConfigurationError::Invalid(format!(
            "workflow.default_warning_threshold must be 1-100, got {threshold}"
        )));
    }
    if config.events.publisher_capacity == 0 {
        return Err(ConfigurationError::Invalid(
            "events.publisher_capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

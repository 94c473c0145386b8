//! Typed CronoStar configuration
//!
//! ```yaml
//! profiles_dir: /config/cronostar/profiles
//! cache_ttl_secs: 60
//! home_assistant:
//!   url: http://homeassistant.local:8123
//!   token: !secret cronostar_token
//! controllers:
//!   - name: living_room
//!     preset: thermostat
//!     target_entity: climate.living_room
//!     global_prefix: cronostar_thermostat_living_
//!     profile: Comfort
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::loader::load_yaml;
use cronostar_core::{EntityId, InterpolationMode, PresetType};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "cronostar.yaml";

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_interval_secs() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

/// Connection to the Home Assistant REST API
#[derive(Debug, Clone, Deserialize)]
pub struct HomeAssistantConfig {
    pub url: String,
    pub token: String,
}

/// One schedule-to-entity binding
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    pub name: String,
    pub preset: PresetType,
    pub target_entity: EntityId,
    pub global_prefix: String,
    /// Active profile name
    pub profile: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides the preset's default interpolation mode
    #[serde(default)]
    pub interpolation: Option<InterpolationMode>,
}

impl ControllerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Interpolation mode in effect for this controller
    pub fn mode(&self) -> InterpolationMode {
        self.interpolation
            .unwrap_or_else(|| self.preset.default_mode())
    }
}

/// Root configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CronostarConfig {
    pub profiles_dir: PathBuf,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub home_assistant: Option<HomeAssistantConfig>,
    #[serde(default)]
    pub controllers: Vec<ControllerConfig>,
}

impl CronostarConfig {
    /// Load, tag-process and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let value = load_yaml(path)?;
        let config: CronostarConfig =
            serde_yaml::from_value(value).map_err(|e| ConfigError::Schema {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;

        info!(
            "Loaded configuration from {:?} ({} controllers)",
            path,
            config.controllers.len()
        );
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.controllers.is_empty() {
            return Err(invalid("no controllers configured"));
        }

        let mut names = HashSet::new();
        for controller in &self.controllers {
            if controller.name.trim().is_empty() {
                return Err(invalid("controller name cannot be empty"));
            }
            if !names.insert(controller.name.as_str()) {
                return Err(invalid(format!(
                    "duplicate controller name '{}'",
                    controller.name
                )));
            }
            if controller.global_prefix.trim().is_empty() {
                return Err(invalid(format!(
                    "controller '{}': global_prefix cannot be empty",
                    controller.name
                )));
            }
            if controller.profile.trim().is_empty() {
                return Err(invalid(format!(
                    "controller '{}': profile cannot be empty",
                    controller.name
                )));
            }
            if controller.interval_secs == 0 {
                return Err(invalid(format!(
                    "controller '{}': interval_secs must be at least 1",
                    controller.name
                )));
            }
        }

        if let Some(ha) = &self.home_assistant {
            if !ha.url.starts_with("http://") && !ha.url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "home_assistant.url".to_string(),
                    reason: format!("'{}' is not an http(s) URL", ha.url),
                });
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        message: message.into(),
    }
}

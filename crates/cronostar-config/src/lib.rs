//! Configuration loading for CronoStar
//!
//! The configuration is a YAML file supporting two custom tags:
//!
//! - `!secret key` - Substitute from `secrets.yaml` next to the file
//! - `!env_var VAR` - Environment variable substitution
//!
//! # Example
//!
//! ```ignore
//! use cronostar_config::CronostarConfig;
//!
//! let config = CronostarConfig::load("/config/cronostar.yaml")?;
//! for controller in &config.controllers {
//!     println!("{} -> {}", controller.name, controller.target_entity);
//! }
//! ```

mod config;
mod error;
mod loader;
mod secrets;

pub use config::{ControllerConfig, CronostarConfig, HomeAssistantConfig, DEFAULT_CONFIG_FILE};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use secrets::{Secrets, SECRETS_FILE};

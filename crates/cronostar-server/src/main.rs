//! CronoStar Server
//!
//! Loads the configuration, starts one scheduling task per controller and
//! runs until interrupted.

use anyhow::{Context, Result};
use cronostar_actuator::{Actuator, RestActuator};
use cronostar_config::{CronostarConfig, DEFAULT_CONFIG_FILE};
use cronostar_scheduler::{Clock, Controller, SchedulingSupervisor, SystemClock};
use cronostar_storage::{ProfileCache, ProfileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable naming the configuration file
const CONFIG_ENV: &str = "CRONOSTAR_CONFIG";

/// The running CronoStar instance
pub struct Cronostar {
    /// Shared profile cache
    pub cache: Arc<ProfileCache>,
    /// Delivers values to Home Assistant
    pub actuator: Arc<dyn Actuator>,
    /// Owns the per-controller tasks
    pub supervisor: SchedulingSupervisor,
    config: CronostarConfig,
}

impl Cronostar {
    pub fn new(config: CronostarConfig) -> Result<Self> {
        let ha = config
            .home_assistant
            .as_ref()
            .context("home_assistant section is required")?;
        let actuator: Arc<dyn Actuator> = Arc::new(RestActuator::new(&ha.url, &ha.token)?);

        let store = ProfileStore::new(&config.profiles_dir);
        let cache = Arc::new(ProfileCache::new(store, config.cache_ttl()));

        Ok(Self {
            cache,
            actuator,
            supervisor: SchedulingSupervisor::new(),
            config,
        })
    }

    /// Start a task for every configured controller
    pub fn start(&self, clock: Arc<dyn Clock>) -> Result<()> {
        for controller_config in &self.config.controllers {
            let controller = Controller::from_config(
                controller_config,
                self.cache.clone(),
                self.actuator.clone(),
                clock.clone(),
            )
            .with_context(|| format!("cannot start controller '{}'", controller_config.name))?;
            self.supervisor.start(controller);
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting CronoStar");

    let path = config_path();
    let config = CronostarConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {:?}", path))?;

    let cronostar = Cronostar::new(config)?;
    cronostar.start(Arc::new(SystemClock))?;

    info!(
        "CronoStar is running with {} controllers",
        cronostar.supervisor.controllers().len()
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    cronostar.supervisor.stop_all().await;

    Ok(())
}

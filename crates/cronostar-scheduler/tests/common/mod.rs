//! Shared fixtures for scheduler tests

#![allow(dead_code)]

use cronostar_actuator::{ServiceBus, ServiceBusActuator, ServiceCall};
use cronostar_config::ControllerConfig;
use cronostar_core::PresetType;
use cronostar_scheduler::{Controller, FixedClock, TickOutcome};
use cronostar_storage::{ProfileCache, ProfileStore};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub type CallLog = Arc<Mutex<Vec<ServiceCall>>>;

pub struct Harness {
    pub dir: TempDir,
    pub cache: Arc<ProfileCache>,
    pub bus: Arc<ServiceBus>,
    pub calls: CallLog,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    /// Empty profile directory, uncached reads, clock at 14:00
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(ProfileCache::new(
            ProfileStore::new(dir.path()),
            Duration::ZERO,
        ));
        let bus = Arc::new(ServiceBus::new());
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));

        for (domain, service) in [
            ("climate", "set_temperature"),
            ("switch", "turn_on"),
            ("switch", "turn_off"),
            ("cover", "set_cover_position"),
        ] {
            record(&bus, &calls, domain, service);
        }

        Self {
            dir,
            cache,
            bus,
            calls,
            clock: Arc::new(FixedClock::new("14:00".parse().unwrap())),
        }
    }

    /// Thermostat container `living` with Comfort, Away and Hot profiles
    pub async fn with_thermostat_profiles(self) -> Self {
        let profiles = [
            (
                "Comfort",
                vec![
                    json!({"time": "08:00", "value": 20.0}),
                    json!({"time": "20:00", "value": 18.0}),
                ],
            ),
            ("Away", vec![json!({"time": "00:00", "value": 16.0})]),
            ("Hot", vec![json!({"time": "00:00", "value": 35.0})]),
        ];
        for (name, schedule) in profiles {
            self.cache
                .save_profile(PresetType::Thermostat, "living_", name, schedule)
                .await
                .unwrap();
        }
        self
    }

    pub fn controller(&self, config: &ControllerConfig) -> Controller {
        Controller::from_config(
            config,
            self.cache.clone(),
            Arc::new(ServiceBusActuator::new(self.bus.clone())),
            self.clock.clone(),
        )
        .unwrap()
    }

    pub fn set_time(&self, time: &str) {
        self.clock.set(time.parse().unwrap());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> ServiceCall {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

/// Register a handler that records every call it receives
pub fn record(bus: &ServiceBus, calls: &CallLog, domain: &str, service: &str) {
    let calls = calls.clone();
    bus.register(domain, service, move |call| {
        calls.lock().unwrap().push(call);
        async { Ok(()) }
    });
}

pub fn thermostat_config(profile: &str) -> ControllerConfig {
    controller_config(
        "living_room",
        "thermostat",
        "climate.living_room",
        "living_",
        profile,
    )
}

pub fn controller_config(
    name: &str,
    preset: &str,
    entity: &str,
    prefix: &str,
    profile: &str,
) -> ControllerConfig {
    serde_yaml::from_str(&format!(
        "{{name: {name}, preset: {preset}, target_entity: {entity}, global_prefix: {prefix}, profile: {profile}, interval_secs: 3600}}"
    ))
    .unwrap()
}

pub fn applied_value(outcome: &TickOutcome) -> Option<f64> {
    match outcome {
        TickOutcome::Applied { value, .. } => Some(*value),
        _ => None,
    }
}

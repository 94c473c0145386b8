//! A single schedule-to-entity binding
//!
//! A [`Controller`] owns everything needed to drive one target entity from
//! one profile: the container it reads, the resolved target, and the last
//! value it successfully applied. [`Controller::tick`] is the periodic
//! entry point; it only actuates when the scheduled value actually moved.

use crate::clock::Clock;
use crate::error::{SchedulerError, SchedulerResult};
use cronostar_actuator::{Actuator, Capability, Target};
use cronostar_config::ControllerConfig;
use cronostar_core::{
    evaluate_at, values_differ, EntityId, EvaluationResult, InterpolationMode, NextChange,
    PresetType, Schedule,
};
use cronostar_storage::{container_file_name, ProfileCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// What a single evaluation pass did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A value was pushed to the target
    Applied {
        value: f64,
        next_change: Option<NextChange>,
    },
    /// The scheduled value matches what was last applied
    Unchanged { value: f64 },
    /// Missing container, missing profile, or an empty schedule
    NoValue,
    /// Periodic application is suspended
    Paused,
    /// Loading or actuation failed; the next tick retries
    Failed(String),
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickOutcome::Applied { .. })
    }
}

/// Snapshot of a controller's state
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerStatus {
    pub name: String,
    pub entity_id: EntityId,
    pub profile: String,
    pub paused: bool,
    pub last_applied: Option<f64>,
}

pub struct Controller {
    name: String,
    preset: PresetType,
    target: Target,
    container_file: String,
    profile: String,
    mode: InterpolationMode,
    interval: Duration,
    paused: bool,
    last_applied: Option<f64>,
    cache: Arc<ProfileCache>,
    actuator: Arc<dyn Actuator>,
    clock: Arc<dyn Clock>,
}

impl Controller {
    /// Build a controller, resolving the target's capability up front
    pub fn from_config(
        config: &ControllerConfig,
        cache: Arc<ProfileCache>,
        actuator: Arc<dyn Actuator>,
        clock: Arc<dyn Clock>,
    ) -> SchedulerResult<Self> {
        let target = Target::new(config.target_entity.clone());
        if !target.is_supported() {
            return Err(SchedulerError::UnsupportedTarget {
                controller: config.name.clone(),
                entity_id: config.target_entity.clone(),
            });
        }

        // Cover positions only make sense on the 0-100 cover scale
        let is_cover = target.capability() == Capability::Cover;
        if is_cover != (config.preset == PresetType::GenericCover) {
            return Err(SchedulerError::IncompatiblePreset {
                controller: config.name.clone(),
                entity_id: config.target_entity.clone(),
                preset: config.preset,
            });
        }

        let container_file = container_file_name(config.preset, &config.global_prefix);
        debug!(
            controller = %config.name,
            entity_id = %config.target_entity,
            capability = ?target.capability(),
            container = %container_file,
            "Controller created"
        );

        Ok(Self {
            name: config.name.clone(),
            preset: config.preset,
            target,
            container_file,
            profile: config.profile.clone(),
            mode: config.mode(),
            interval: config.interval(),
            paused: !config.enabled,
            last_applied: None,
            cache,
            actuator,
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn container_file(&self) -> &str {
        &self.container_file
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_applied(&self) -> Option<f64> {
        self.last_applied
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            name: self.name.clone(),
            entity_id: self.target.entity_id().clone(),
            profile: self.profile.clone(),
            paused: self.paused,
            last_applied: self.last_applied,
        }
    }

    /// Switch to another profile; the next tick applies unconditionally
    pub fn set_profile(&mut self, profile: impl Into<String>) {
        self.profile = profile.into();
        self.last_applied = None;
        info!(controller = %self.name, profile = %self.profile, "Profile changed");
    }

    pub fn pause(&mut self) {
        self.paused = true;
        info!(controller = %self.name, "Paused");
    }

    /// Resume periodic application, re-applying on the next tick
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_applied = None;
        info!(controller = %self.name, "Resumed");
    }

    /// The active profile's schedule, if both the container and profile exist
    pub async fn schedule(&self) -> SchedulerResult<Option<Schedule>> {
        let Some(container) = self.cache.get(&self.container_file).await? else {
            warn!(
                controller = %self.name,
                container = %self.container_file,
                "Profile container not found"
            );
            return Ok(None);
        };

        if container.meta.preset_type != self.preset {
            warn!(
                controller = %self.name,
                container = %self.container_file,
                found = %container.meta.preset_type,
                "Container preset differs from controller preset"
            );
        }

        let schedule = container.schedule(&self.profile, self.mode);
        if schedule.is_none() {
            warn!(
                controller = %self.name,
                profile = %self.profile,
                "Profile not found in container"
            );
        }
        Ok(schedule)
    }

    /// Evaluate the active profile at the clock's current time
    pub async fn evaluate(&self) -> SchedulerResult<EvaluationResult> {
        let now = self.clock.now();
        Ok(self
            .schedule()
            .await?
            .map(|schedule| evaluate_at(&schedule, now))
            .unwrap_or_default())
    }

    /// Periodic pass: apply the scheduled value if it changed
    pub async fn tick(&mut self) -> TickOutcome {
        if self.paused {
            trace!(controller = %self.name, "Tick skipped while paused");
            return TickOutcome::Paused;
        }
        self.run(false).await
    }

    /// Apply the scheduled value now, even if unchanged or paused
    pub async fn apply_now(&mut self) -> TickOutcome {
        self.run(true).await
    }

    async fn run(&mut self, force: bool) -> TickOutcome {
        let result = match self.evaluate().await {
            Ok(result) => result,
            Err(e) => {
                error!(controller = %self.name, error = %e, "Failed to load schedule");
                return TickOutcome::Failed(e.to_string());
            }
        };

        let Some(scheduled) = result.current_value else {
            debug!(controller = %self.name, "No scheduled value");
            return TickOutcome::NoValue;
        };

        let value = self.preset.clamp(scheduled);
        if value != scheduled {
            debug!(
                controller = %self.name,
                scheduled,
                value,
                "Clamped to preset range"
            );
        }

        if !force {
            if let Some(last) = self.last_applied {
                if !values_differ(last, value) {
                    trace!(controller = %self.name, value, "Value unchanged");
                    return TickOutcome::Unchanged { value };
                }
            }
        }

        if let Err(e) = self.actuator.apply(&self.target, value).await {
            error!(
                controller = %self.name,
                entity_id = %self.target.entity_id(),
                value,
                error = %e,
                "Actuation failed"
            );
            return TickOutcome::Failed(e.to_string());
        }
        self.last_applied = Some(value);

        match &result.next_change {
            Some(next) => info!(
                controller = %self.name,
                entity_id = %self.target.entity_id(),
                value,
                next_at = %next.at,
                next_value = next.value,
                minutes_until = next.minutes_until,
                "Applied scheduled value"
            ),
            None => info!(
                controller = %self.name,
                entity_id = %self.target.entity_id(),
                value,
                "Applied scheduled value, no further changes"
            ),
        }

        TickOutcome::Applied {
            value,
            next_change: result.next_change,
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("container_file", &self.container_file)
            .field("profile", &self.profile)
            .field("paused", &self.paused)
            .field("last_applied", &self.last_applied)
            .finish_non_exhaustive()
    }
}

//! Profile container model
//!
//! A container is one JSON file holding every profile that shares a preset
//! and storage prefix:
//!
//! ```json
//! {
//!   "meta": {
//!     "preset_type": "thermostat",
//!     "global_prefix": "cronostar_thermostat_living_",
//!     "target_entity": "climate.living_room",
//!     "updated_at": "2026-10-19T08:00:00Z"
//!   },
//!   "profiles": {
//!     "Comfort": {
//!       "schedule": [{"time": "08:00", "value": 20.0}],
//!       "updated_at": "2026-10-19T08:00:00Z"
//!     }
//!   }
//! }
//! ```
//!
//! Schedule entries are kept as raw JSON. Malformed entries survive a load
//! and save unchanged and are only discarded when a [`Schedule`] is built.

use chrono::{DateTime, Utc};
use cronostar_core::{EntityId, InterpolationMode, PresetType, Schedule};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Container-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMeta {
    pub preset_type: PresetType,
    pub global_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_entity: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One named profile
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub schedule: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A persisted set of profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileContainer {
    pub meta: ContainerMeta,
    #[serde(default)]
    pub profiles: IndexMap<String, ProfileData>,
}

impl ProfileContainer {
    /// Create an empty container
    pub fn new(preset: PresetType, global_prefix: impl Into<String>) -> Self {
        Self {
            meta: ContainerMeta {
                preset_type: preset,
                global_prefix: global_prefix.into(),
                target_entity: None,
                updated_at: None,
            },
            profiles: IndexMap::new(),
        }
    }

    pub fn profile(&self, name: &str) -> Option<&ProfileData> {
        self.profiles.get(name)
    }

    /// Profile names in stored order
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Build the schedule of a profile
    ///
    /// Returns `None` if the profile does not exist. Malformed points are
    /// discarded with a warning.
    pub fn schedule(&self, name: &str, mode: InterpolationMode) -> Option<Schedule> {
        self.profiles
            .get(name)
            .map(|profile| Schedule::from_json_points(&profile.schedule, mode))
    }

    /// Insert or replace a profile, stamping both profile and container
    pub fn upsert_profile(&mut self, name: impl Into<String>, schedule: Vec<serde_json::Value>) {
        let now = Utc::now();
        self.profiles.insert(
            name.into(),
            ProfileData {
                schedule,
                updated_at: Some(now),
            },
        );
        self.meta.updated_at = Some(now);
    }

    /// Remove a profile, keeping the order of the others
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let removed = self.profiles.shift_remove(name).is_some();
        if removed {
            self.meta.updated_at = Some(Utc::now());
        }
        removed
    }
}

/// File name of the container for a preset and storage prefix
///
/// `cronostar_<preset>_<prefix>.json`, with trailing underscores stripped
/// from the prefix and the `cronostar_<preset>_` head not repeated when the
/// prefix already carries it.
pub fn container_file_name(preset: PresetType, global_prefix: &str) -> String {
    let head = format!("cronostar_{}_", preset.as_str());
    let prefix = global_prefix.trim_end_matches('_');
    let prefix = prefix.strip_prefix(head.as_str()).unwrap_or(prefix);
    format!("{}{}.json", head, prefix)
}

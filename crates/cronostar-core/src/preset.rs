//! Preset types and their defaults
//!
//! A preset describes the kind of entity a profile drives. It decides the
//! default interpolation mode, the unit shown to users and the range the
//! scheduled value is clamped to before it reaches the target.

use crate::schedule::InterpolationMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown preset type '{0}'")]
pub struct UnknownPreset(pub String);

/// Category of target entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetType {
    Thermostat,
    EvCharging,
    GenericSwitch,
    GenericKwh,
    GenericTemperature,
    /// Cover position in percent
    GenericCover,
}

impl PresetType {
    pub const ALL: [PresetType; 6] = [
        PresetType::Thermostat,
        PresetType::EvCharging,
        PresetType::GenericSwitch,
        PresetType::GenericKwh,
        PresetType::GenericTemperature,
        PresetType::GenericCover,
    ];

    /// Identifier used in configuration and container file names
    pub fn as_str(self) -> &'static str {
        match self {
            PresetType::Thermostat => "thermostat",
            PresetType::EvCharging => "ev_charging",
            PresetType::GenericSwitch => "generic_switch",
            PresetType::GenericKwh => "generic_kwh",
            PresetType::GenericTemperature => "generic_temperature",
            PresetType::GenericCover => "generic_cover",
        }
    }

    /// Switches hold their value, everything else interpolates
    pub fn default_mode(self) -> InterpolationMode {
        match self {
            PresetType::GenericSwitch => InterpolationMode::Stepped,
            _ => InterpolationMode::Continuous,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            PresetType::Thermostat | PresetType::GenericTemperature => "°C",
            PresetType::EvCharging => "kW",
            PresetType::GenericKwh => "kWh",
            PresetType::GenericCover => "%",
            PresetType::GenericSwitch => "",
        }
    }

    pub fn min_value(self) -> f64 {
        match self {
            PresetType::Thermostat => 15.0,
            _ => 0.0,
        }
    }

    pub fn max_value(self) -> f64 {
        match self {
            PresetType::Thermostat => 30.0,
            PresetType::EvCharging => 8.0,
            PresetType::GenericSwitch => 1.0,
            PresetType::GenericKwh => 7.0,
            PresetType::GenericTemperature => 40.0,
            PresetType::GenericCover => 100.0,
        }
    }

    pub fn step(self) -> f64 {
        match self {
            PresetType::GenericSwitch | PresetType::GenericCover => 1.0,
            _ => 0.5,
        }
    }

    /// Clamp a scheduled value into this preset's range
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min_value(), self.max_value())
    }
}

impl FromStr for PresetType {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modes() {
        assert_eq!(
            PresetType::GenericSwitch.default_mode(),
            InterpolationMode::Stepped
        );
        assert_eq!(
            PresetType::Thermostat.default_mode(),
            InterpolationMode::Continuous
        );
        assert_eq!(
            PresetType::EvCharging.default_mode(),
            InterpolationMode::Continuous
        );
        assert_eq!(
            PresetType::GenericCover.default_mode(),
            InterpolationMode::Continuous
        );
    }

    #[test]
    fn test_clamp() {
        assert_eq!(PresetType::Thermostat.clamp(12.0), 15.0);
        assert_eq!(PresetType::Thermostat.clamp(21.5), 21.5);
        assert_eq!(PresetType::GenericSwitch.clamp(3.0), 1.0);
        assert_eq!(PresetType::EvCharging.clamp(-1.0), 0.0);
        assert_eq!(PresetType::GenericCover.clamp(80.0), 80.0);
        assert_eq!(PresetType::GenericCover.clamp(120.0), 100.0);
    }

    #[test]
    fn test_parse_and_display() {
        for preset in PresetType::ALL {
            assert_eq!(preset.as_str().parse::<PresetType>().unwrap(), preset);
            assert_eq!(preset.to_string(), preset.as_str());
        }
        assert!("heatpump".parse::<PresetType>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let p: PresetType = serde_json::from_str("\"ev_charging\"").unwrap();
        assert_eq!(p, PresetType::EvCharging);
        assert_eq!(
            serde_json::to_string(&PresetType::GenericKwh).unwrap(),
            "\"generic_kwh\""
        );
    }
}

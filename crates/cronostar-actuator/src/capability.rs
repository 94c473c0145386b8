//! What a target entity can be told to do
//!
//! The capability is resolved once from the entity's domain and then maps
//! every scheduled value to a single Home Assistant service call.

use cronostar_core::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Switch-like targets turn on at or above this value
pub const SWITCH_ON_THRESHOLD: f64 = 0.5;

/// Actuation capability of a target entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// `climate.set_temperature`
    Climate,
    /// `turn_on` / `turn_off`
    Switch,
    /// `cover.set_cover_position`
    Cover,
    /// `set_value` on `input_number` / `number`
    NumericInput,
    Unsupported,
}

/// A service call ready to be sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCommand {
    pub domain: String,
    pub service: String,
    pub data: serde_json::Value,
}

impl ServiceCommand {
    /// `domain.service`
    pub fn service_id(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }
}

impl Capability {
    pub fn resolve(entity_id: &EntityId) -> Self {
        match entity_id.domain() {
            "climate" => Capability::Climate,
            "switch" | "input_boolean" => Capability::Switch,
            "cover" => Capability::Cover,
            "input_number" | "number" => Capability::NumericInput,
            _ => Capability::Unsupported,
        }
    }

    /// The service call that applies `value` to `entity_id`
    pub fn command(self, entity_id: &EntityId, value: f64) -> Option<ServiceCommand> {
        let entity = entity_id.to_string();
        let (domain, service, data) = match self {
            Capability::Climate => (
                "climate",
                "set_temperature",
                json!({"entity_id": entity, "temperature": value}),
            ),
            Capability::Switch => {
                let service = if value >= SWITCH_ON_THRESHOLD {
                    "turn_on"
                } else {
                    "turn_off"
                };
                (entity_id.domain(), service, json!({"entity_id": entity}))
            }
            Capability::Cover => {
                let position = value.round().clamp(0.0, 100.0) as u8;
                (
                    "cover",
                    "set_cover_position",
                    json!({"entity_id": entity, "position": position}),
                )
            }
            Capability::NumericInput => (
                entity_id.domain(),
                "set_value",
                json!({"entity_id": entity, "value": value}),
            ),
            Capability::Unsupported => return None,
        };

        Some(ServiceCommand {
            domain: domain.to_string(),
            service: service.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve() {
        assert_eq!(Capability::resolve(&id("climate.living")), Capability::Climate);
        assert_eq!(Capability::resolve(&id("switch.pump")), Capability::Switch);
        assert_eq!(
            Capability::resolve(&id("input_boolean.away")),
            Capability::Switch
        );
        assert_eq!(Capability::resolve(&id("cover.blind")), Capability::Cover);
        assert_eq!(
            Capability::resolve(&id("input_number.setpoint")),
            Capability::NumericInput
        );
        assert_eq!(
            Capability::resolve(&id("number.charger_current")),
            Capability::NumericInput
        );
        assert_eq!(
            Capability::resolve(&id("light.kitchen")),
            Capability::Unsupported
        );
    }

    #[test]
    fn test_climate_command() {
        let cmd = Capability::Climate
            .command(&id("climate.living"), 20.5)
            .unwrap();
        assert_eq!(cmd.service_id(), "climate.set_temperature");
        assert_eq!(
            cmd.data,
            json!({"entity_id": "climate.living", "temperature": 20.5})
        );
    }

    #[test]
    fn test_switch_command_uses_entity_domain() {
        let on = Capability::Switch.command(&id("switch.pump"), 1.0).unwrap();
        assert_eq!(on.service_id(), "switch.turn_on");

        let off = Capability::Switch
            .command(&id("input_boolean.away"), 0.0)
            .unwrap();
        assert_eq!(off.service_id(), "input_boolean.turn_off");
        assert_eq!(off.data, json!({"entity_id": "input_boolean.away"}));

        let half = Capability::Switch.command(&id("switch.pump"), 0.5).unwrap();
        assert_eq!(half.service, "turn_on");
    }

    #[test]
    fn test_cover_position_is_clamped() {
        let cmd = Capability::Cover.command(&id("cover.blind"), 42.6).unwrap();
        assert_eq!(cmd.data["position"], json!(43));

        let cmd = Capability::Cover.command(&id("cover.blind"), 140.0).unwrap();
        assert_eq!(cmd.data["position"], json!(100));

        let cmd = Capability::Cover.command(&id("cover.blind"), -3.0).unwrap();
        assert_eq!(cmd.data["position"], json!(0));
    }

    #[test]
    fn test_numeric_command() {
        let cmd = Capability::NumericInput
            .command(&id("number.charger_current"), 6.5)
            .unwrap();
        assert_eq!(cmd.service_id(), "number.set_value");
        assert_eq!(cmd.data["value"], json!(6.5));
    }

    #[test]
    fn test_unsupported_has_no_command() {
        assert!(Capability::Unsupported
            .command(&id("light.kitchen"), 1.0)
            .is_none());
    }
}

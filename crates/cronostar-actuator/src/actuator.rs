//! Actuator abstraction and the service-bus backed implementation

use crate::capability::{Capability, ServiceCommand};
use crate::service_bus::{ServiceBus, ServiceError};
use async_trait::async_trait;
use cronostar_core::EntityId;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while pushing a value to a target
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("entity {0} has no supported actuation service")]
    Unsupported(EntityId),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Home Assistant rejected {service} with status {status}: {body}")]
    Rejected {
        service: String,
        status: u16,
        body: String,
    },
}

/// Result type for actuation
pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// A target entity with its capability resolved once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    entity_id: EntityId,
    capability: Capability,
}

impl Target {
    pub fn new(entity_id: EntityId) -> Self {
        let capability = Capability::resolve(&entity_id);
        Self {
            entity_id,
            capability,
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn is_supported(&self) -> bool {
        self.capability != Capability::Unsupported
    }

    /// The service call applying `value` to this target
    pub fn command(&self, value: f64) -> ActuatorResult<ServiceCommand> {
        self.capability
            .command(&self.entity_id, value)
            .ok_or_else(|| ActuatorError::Unsupported(self.entity_id.clone()))
    }
}

/// Pushes scheduled values to target entities
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn apply(&self, target: &Target, value: f64) -> ActuatorResult<()>;
}

/// Actuator dispatching onto an in-process [`ServiceBus`]
pub struct ServiceBusActuator {
    bus: Arc<ServiceBus>,
}

impl ServiceBusActuator {
    pub fn new(bus: Arc<ServiceBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<ServiceBus> {
        &self.bus
    }
}

#[async_trait]
impl Actuator for ServiceBusActuator {
    async fn apply(&self, target: &Target, value: f64) -> ActuatorResult<()> {
        let command = target.command(value)?;
        debug!(
            entity_id = %target.entity_id(),
            service = %command.service_id(),
            value,
            "Dispatching to service bus"
        );
        self.bus
            .call(&command.domain, &command.service, command.data)
            .await?;
        Ok(())
    }
}

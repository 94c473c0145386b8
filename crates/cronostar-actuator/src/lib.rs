//! Actuation for CronoStar
//!
//! Turns a scheduled value into a Home Assistant service call for the
//! target entity. The target's [`Capability`] is resolved once from its
//! domain; the [`Actuator`] trait delivers the call, either onto an
//! in-process [`ServiceBus`] or over the Home Assistant REST API.

mod actuator;
mod capability;
mod rest;
mod service_bus;

pub use actuator::{Actuator, ActuatorError, ActuatorResult, ServiceBusActuator, Target};
pub use capability::{Capability, ServiceCommand, SWITCH_ON_THRESHOLD};
pub use rest::{RestActuator, REQUEST_TIMEOUT};
pub use service_bus::{
    ServiceBus, ServiceCall, ServiceError, ServiceFuture, ServiceHandler, ServiceResult,
};

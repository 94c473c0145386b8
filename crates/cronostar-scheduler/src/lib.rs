//! Scheduling for CronoStar
//!
//! A [`Controller`] binds one profile to one target entity. The
//! [`SchedulingSupervisor`] runs each controller in its own task, ticking
//! on the controller's interval, and routes commands such as "apply now"
//! or a profile switch to the right task.

mod clock;
mod controller;
mod error;
mod supervisor;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{Controller, ControllerStatus, TickOutcome};
pub use error::{SchedulerError, SchedulerResult};
pub use supervisor::SchedulingSupervisor;

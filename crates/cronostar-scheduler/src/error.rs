//! Scheduler error types

use cronostar_core::{EntityId, PresetType};
use cronostar_storage::StorageError;
use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("controller '{controller}': entity {entity_id} cannot be actuated")]
    UnsupportedTarget {
        controller: String,
        entity_id: EntityId,
    },

    #[error("controller '{controller}': preset '{preset}' cannot drive {entity_id}")]
    IncompatiblePreset {
        controller: String,
        entity_id: EntityId,
        preset: PresetType,
    },

    #[error("unknown controller '{0}'")]
    UnknownController(String),

    #[error("scheduling task for '{0}' has stopped")]
    TaskStopped(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

//! Core types for CronoStar
//!
//! This crate provides the types shared by every CronoStar component:
//! [`TimeOfDay`], [`Schedule`] and its points, [`PresetType`], [`EntityId`],
//! and the schedule evaluator that turns a profile into the value in
//! effect at a given time of day.
//!
//! Nothing here performs I/O; the evaluator is a pair of pure functions.

mod entity_id;
pub mod evaluator;
mod preset;
mod schedule;
mod time_of_day;

pub use entity_id::{EntityId, EntityIdError};
pub use evaluator::{
    evaluate, evaluate_at, next_change, values_differ, EvaluationResult, NextChange,
    VALUE_TOLERANCE,
};
pub use preset::{PresetType, UnknownPreset};
pub use schedule::{InterpolationMode, PointError, Schedule, SchedulePoint};
pub use time_of_day::{TimeOfDay, TimeOfDayError, MINUTES_PER_DAY};

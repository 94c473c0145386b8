//! Schedule points and schedules
//!
//! A [`Schedule`] is the list of `(time of day, value)` points of one
//! profile. Points are kept sorted by time of day; points sharing a time
//! keep the order they were given in.

use crate::time_of_day::{TimeOfDay, TimeOfDayError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// How values between two points are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Linear interpolation between the bracketing points
    #[default]
    Continuous,
    /// Hold the most recent point's value until the next point
    Stepped,
}

/// One scheduled instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulePoint {
    #[serde(rename = "time")]
    pub time_of_day: TimeOfDay,
    pub value: f64,
}

impl SchedulePoint {
    pub fn new(time_of_day: TimeOfDay, value: f64) -> Self {
        Self { time_of_day, value }
    }
}

/// Reasons a persisted point is rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PointError {
    #[error("point is not an object")]
    NotAnObject,

    #[error("point has no 'time'")]
    MissingTime,

    #[error("point has no 'value'")]
    MissingValue,

    #[error("invalid time: {0}")]
    InvalidTime(#[from] TimeOfDayError),

    #[error("value {0} is not a finite number")]
    InvalidValue(String),
}

impl SchedulePoint {
    /// Parse a persisted `{"time": "HH:MM", "value": <number>}` object
    ///
    /// Numeric strings are accepted for `value`.
    pub fn from_json(raw: &Value) -> Result<Self, PointError> {
        let obj = raw.as_object().ok_or(PointError::NotAnObject)?;

        let time = match obj.get("time") {
            None | Some(Value::Null) => return Err(PointError::MissingTime),
            Some(Value::String(s)) => s.parse::<TimeOfDay>()?,
            Some(other) => {
                return Err(TimeOfDayError::InvalidFormat(other.to_string()).into());
            }
        };

        let value = match obj.get("value") {
            None | Some(Value::Null) => return Err(PointError::MissingValue),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| PointError::InvalidValue(n.to_string()))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| PointError::InvalidValue(s.clone()))?,
            Some(other) => return Err(PointError::InvalidValue(other.to_string())),
        };

        if !value.is_finite() {
            return Err(PointError::InvalidValue(value.to_string()));
        }

        Ok(Self::new(time, value))
    }
}

/// The ordered points of one profile plus its interpolation mode
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    points: Vec<SchedulePoint>,
    mode: InterpolationMode,
}

impl Schedule {
    /// Build a schedule, sorting points by time of day (stable)
    pub fn new(mut points: Vec<SchedulePoint>, mode: InterpolationMode) -> Self {
        points.sort_by_key(|p| p.time_of_day);
        Self { points, mode }
    }

    pub fn empty(mode: InterpolationMode) -> Self {
        Self {
            points: Vec::new(),
            mode,
        }
    }

    /// Build a schedule from persisted JSON points
    ///
    /// Malformed entries are dropped individually with a warning; the
    /// remaining points form the schedule.
    pub fn from_json_points(raw: &[Value], mode: InterpolationMode) -> Self {
        let points = raw
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match SchedulePoint::from_json(entry) {
                Ok(point) => Some(point),
                Err(e) => {
                    warn!(index, point = %entry, "Discarding schedule point: {}", e);
                    None
                }
            })
            .collect();

        Self::new(points, mode)
    }

    pub fn points(&self) -> &[SchedulePoint] {
        &self.points
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Same points with a different interpolation mode
    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }
}

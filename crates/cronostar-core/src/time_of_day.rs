//! Wall-clock time of day with minute resolution

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: u16 = 1440;

/// Error type for invalid times of day
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeOfDayError {
    #[error("'{0}' is not a valid time (expected HH:MM)")]
    InvalidFormat(String),

    #[error("hour {0} is out of range (0-23)")]
    HourOutOfRange(u32),

    #[error("minute {0} is out of range (0-59)")]
    MinuteOutOfRange(u32),

    #[error("{0} minutes since midnight is out of range (0-1439)")]
    MinutesOutOfRange(u32),
}

/// A time of day, stored as minutes since midnight in `[0, 1440)`
///
/// Parses from and displays as `"HH:MM"`. Seconds are accepted when parsing
/// (`"HH:MM:SS"`) and truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight (00:00)
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Create from minutes since midnight
    pub fn from_minutes(minutes: u32) -> Result<Self, TimeOfDayError> {
        if minutes >= MINUTES_PER_DAY as u32 {
            return Err(TimeOfDayError::MinutesOutOfRange(minutes));
        }
        Ok(Self(minutes as u16))
    }

    /// Create from an hour and minute pair
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeOfDayError> {
        if hour > 23 {
            return Err(TimeOfDayError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeOfDayError::MinuteOutOfRange(minute));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        (self.0 / 60) as u32
    }

    pub fn minute(self) -> u32 {
        (self.0 % 60) as u32
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight.
    ///
    /// Equal times are a full day apart.
    pub fn minutes_until(self, later: TimeOfDay) -> u16 {
        if later.0 > self.0 {
            later.0 - self.0
        } else {
            MINUTES_PER_DAY - self.0 + later.0
        }
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');

        let (hour, minute) = match (parts.next(), parts.next()) {
            (Some(h), Some(m)) => (h, m),
            _ => return Err(TimeOfDayError::InvalidFormat(s.to_string())),
        };

        // Optional seconds, must still be numeric
        if let Some(sec) = parts.next() {
            if sec.len() != 2 || !sec.chars().all(|c| c.is_ascii_digit()) {
                return Err(TimeOfDayError::InvalidFormat(s.to_string()));
            }
        }
        if parts.next().is_some() {
            return Err(TimeOfDayError::InvalidFormat(s.to_string()));
        }

        let parse = |field: &str| -> Result<u32, TimeOfDayError> {
            if field.is_empty() || field.len() > 2 || !field.chars().all(|c| c.is_ascii_digit()) {
                return Err(TimeOfDayError::InvalidFormat(s.to_string()));
            }
            field
                .parse()
                .map_err(|_| TimeOfDayError::InvalidFormat(s.to_string()))
        };

        Self::from_hm(parse(hour)?, parse(minute)?)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

//! Schedule evaluation
//!
//! Computes the value a schedule prescribes at a time of day and when that
//! value will next change. Both functions are pure and total: an empty
//! schedule yields `None`, never an error.

use crate::schedule::{InterpolationMode, Schedule, SchedulePoint};
use crate::time_of_day::{TimeOfDay, MINUTES_PER_DAY};
use serde::{Deserialize, Serialize};

/// Values closer than this are treated as the same scheduled value.
///
/// Half of the 0.01 granularity values are persisted and rounded with.
/// Points differing by less than this (1.001 vs 1.004) count as equal:
/// moving between them is never reported as a change and never actuates.
pub const VALUE_TOLERANCE: f64 = 0.005;

/// The next instant at which the effective value changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextChange {
    /// Time of day of the point introducing the new value
    pub at: TimeOfDay,
    /// Minutes from the query time until `at` (1..=1440)
    pub minutes_until: u16,
    /// The point's value
    pub value: f64,
}

/// Value in effect plus the upcoming change, if any
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub current_value: Option<f64>,
    pub next_change: Option<NextChange>,
}

/// Whether two scheduled values should be considered different
pub fn values_differ(a: f64, b: f64) -> bool {
    (a - b).abs() >= VALUE_TOLERANCE
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Value in effect at `query`, or `None` for an empty schedule
pub fn evaluate(schedule: &Schedule, query: TimeOfDay) -> Option<f64> {
    let points = schedule.points();
    let first = points.first()?;
    let last = points.last()?;
    let q = query.minutes();

    // Last point at or before the query, wrapping to yesterday's last point
    let before = points
        .iter()
        .rev()
        .find(|p| p.time_of_day.minutes() <= q)
        .unwrap_or(last);
    // First point at or after the query, wrapping to tomorrow's first point
    let after = points
        .iter()
        .find(|p| p.time_of_day.minutes() >= q)
        .unwrap_or(first);

    if before.time_of_day == query {
        return Some(before.value);
    }
    if after.time_of_day == query {
        return Some(after.value);
    }

    match schedule.mode() {
        InterpolationMode::Stepped => Some(before.value),
        InterpolationMode::Continuous => Some(interpolate(before, after, q)),
    }
}

fn interpolate(before: &SchedulePoint, after: &SchedulePoint, query: u16) -> f64 {
    let before_t = before.time_of_day.minutes() as f64;
    let mut after_t = after.time_of_day.minutes() as f64;
    let mut q = query as f64;

    if after_t < before_t {
        after_t += MINUTES_PER_DAY as f64;
    }
    if q < before_t {
        q += MINUTES_PER_DAY as f64;
    }
    if after_t == before_t {
        return before.value;
    }

    let ratio = (q - before_t) / (after_t - before_t);
    round2(before.value + ratio * (after.value - before.value))
}

/// First point after `query` whose value differs from `current_value`
///
/// Scans forward through the rest of the day, then wraps to the start of
/// the schedule. Returns `None` when every point carries `current_value`.
pub fn next_change(schedule: &Schedule, query: TimeOfDay, current_value: f64) -> Option<NextChange> {
    let points = schedule.points();
    let q = query.minutes();

    let forward = points
        .iter()
        .filter(|p| p.time_of_day.minutes() > q)
        .find(|p| values_differ(p.value, current_value))
        .map(|p| (p, p.time_of_day.minutes() - q));

    let found = forward.or_else(|| {
        points
            .iter()
            .find(|p| values_differ(p.value, current_value))
            .map(|p| (p, MINUTES_PER_DAY - q + p.time_of_day.minutes()))
    });

    found.map(|(point, minutes_until)| NextChange {
        at: point.time_of_day,
        minutes_until,
        value: point.value,
    })
}

/// Evaluate `query` and look up the next change from the evaluated value
pub fn evaluate_at(schedule: &Schedule, query: TimeOfDay) -> EvaluationResult {
    let current_value = evaluate(schedule, query);
    let next_change = current_value.and_then(|value| next_change(schedule, query, value));
    EvaluationResult {
        current_value,
        next_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn schedule(points: &[(&str, f64)], mode: InterpolationMode) -> Schedule {
        Schedule::new(
            points
                .iter()
                .map(|(time, value)| SchedulePoint::new(t(time), *value))
                .collect(),
            mode,
        )
    }

    fn day_night() -> Schedule {
        schedule(
            &[("08:00", 20.0), ("20:00", 18.0)],
            InterpolationMode::Continuous,
        )
    }

    #[test]
    fn test_interpolates_midday() {
        assert_eq!(evaluate(&day_night(), t("14:00")), Some(19.0));
    }

    #[test]
    fn test_interpolates_across_midnight() {
        // before = 20:00 (18.0), after = 08:00 tomorrow (20.0)
        assert_eq!(evaluate(&day_night(), t("23:00")), Some(18.5));
        // query before the first point wraps the query too
        assert_eq!(evaluate(&day_night(), t("02:00")), Some(19.0));
    }

    #[test]
    fn test_exact_match_returns_point_value() {
        assert_eq!(evaluate(&day_night(), t("08:00")), Some(20.0));
        assert_eq!(evaluate(&day_night(), t("20:00")), Some(18.0));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let s = schedule(
            &[("00:00", 0.0), ("00:03", 1.0)],
            InterpolationMode::Continuous,
        );
        assert_eq!(evaluate(&s, t("00:01")), Some(0.33));
        assert_eq!(evaluate(&s, t("00:02")), Some(0.67));
    }

    #[test]
    fn test_stepped_holds_previous_value() {
        let s = schedule(&[("00:00", 0.0), ("18:00", 1.0)], InterpolationMode::Stepped);
        assert_eq!(evaluate(&s, t("20:00")), Some(1.0));
        assert_eq!(evaluate(&s, t("17:59")), Some(0.0));
        assert_eq!(evaluate(&s, t("18:00")), Some(1.0));
    }

    #[test]
    fn test_stepped_wraps_to_previous_day() {
        let s = schedule(&[("06:00", 1.0), ("22:00", 0.0)], InterpolationMode::Stepped);
        assert_eq!(evaluate(&s, t("03:00")), Some(0.0));
    }

    #[test]
    fn test_empty_schedule_has_no_value() {
        let s = Schedule::empty(InterpolationMode::Continuous);
        assert_eq!(evaluate(&s, t("12:00")), None);
        assert_eq!(next_change(&s, t("12:00"), 20.0), None);
        assert_eq!(evaluate_at(&s, t("12:00")), EvaluationResult::default());
    }

    #[test]
    fn test_single_point_is_constant() {
        let s = schedule(&[("07:00", 21.5)], InterpolationMode::Continuous);
        assert_eq!(evaluate(&s, t("00:00")), Some(21.5));
        assert_eq!(evaluate(&s, t("07:00")), Some(21.5));
        assert_eq!(evaluate(&s, t("23:59")), Some(21.5));
        assert_eq!(next_change(&s, t("12:00"), 21.5), None);
    }

    #[test]
    fn test_duplicate_timestamps_do_not_divide_by_zero() {
        let s = schedule(
            &[("10:00", 5.0), ("10:00", 7.0)],
            InterpolationMode::Continuous,
        );
        // before is the last duplicate, after the first; both wrap to 10:00
        assert_eq!(evaluate(&s, t("15:00")), Some(7.0));
        assert_eq!(evaluate(&s, t("10:00")), Some(7.0));
    }

    #[test]
    fn test_next_change_forward() {
        let s = day_night();
        let change = next_change(&s, t("14:00"), 19.0).unwrap();
        assert_eq!(change.at, t("20:00"));
        assert_eq!(change.minutes_until, 360);
        assert_eq!(change.value, 18.0);
    }

    #[test]
    fn test_next_change_wraps() {
        let s = schedule(&[("00:00", 0.0), ("18:00", 1.0)], InterpolationMode::Stepped);
        let change = next_change(&s, t("20:00"), 1.0).unwrap();
        assert_eq!(change.at, t("00:00"));
        assert_eq!(change.minutes_until, 240);
        assert_eq!(change.value, 0.0);
    }

    #[test]
    fn test_next_change_skips_equal_values() {
        let s = schedule(
            &[("06:00", 20.0), ("09:00", 20.0), ("17:00", 16.0)],
            InterpolationMode::Stepped,
        );
        let change = next_change(&s, t("07:00"), 20.0).unwrap();
        assert_eq!(change.at, t("17:00"));
        assert_eq!(change.minutes_until, 600);
    }

    #[test]
    fn test_next_change_ignores_rounding_noise() {
        let s = schedule(
            &[("06:00", 20.0), ("18:00", 19.999999)],
            InterpolationMode::Stepped,
        );
        assert_eq!(next_change(&s, t("07:00"), 20.0), None);

        let fine = schedule(&[("06:00", 1.001), ("18:00", 1.004)], InterpolationMode::Stepped);
        assert_eq!(next_change(&fine, t("07:00"), 1.001), None);
    }

    #[test]
    fn test_flat_schedule_never_changes() {
        let s = schedule(
            &[("00:00", 18.0), ("06:00", 18.0), ("18:00", 18.0)],
            InterpolationMode::Continuous,
        );
        for minute in (0..MINUTES_PER_DAY as u32).step_by(37) {
            let q = TimeOfDay::from_minutes(minute).unwrap();
            assert_eq!(next_change(&s, q, 18.0), None);
        }
    }

    #[test]
    fn test_evaluate_at_combines_both() {
        let result = evaluate_at(&day_night(), t("14:00"));
        assert_eq!(result.current_value, Some(19.0));
        let change = result.next_change.unwrap();
        assert_eq!(change.at, t("20:00"));
        assert_eq!(change.value, 18.0);
    }
}

//! Behavioural tests for the schedule evaluator
//!
//! Schedules here are built from persisted-style JSON points, the way the
//! scheduler feeds them in.

use cronostar_core::{
    evaluate, evaluate_at, next_change, InterpolationMode, Schedule, TimeOfDay, MINUTES_PER_DAY,
};
use serde_json::json;

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn all_minutes() -> impl Iterator<Item = TimeOfDay> {
    (0..MINUTES_PER_DAY as u32).map(|m| TimeOfDay::from_minutes(m).unwrap())
}

fn thermostat_week_day() -> Schedule {
    Schedule::from_json_points(
        &[
            json!({"time": "06:30", "value": 21.0}),
            json!({"time": "08:30", "value": 18.5}),
            json!({"time": "17:00", "value": 21.5}),
            json!({"time": "22:30", "value": 17.0}),
        ],
        InterpolationMode::Continuous,
    )
}

// ==================== Reference scenarios ====================

#[test]
fn test_scenario_midday_interpolation() {
    let s = Schedule::from_json_points(
        &[
            json!({"time": "08:00", "value": 20.0}),
            json!({"time": "20:00", "value": 18.0}),
        ],
        InterpolationMode::Continuous,
    );
    assert_eq!(evaluate(&s, t("14:00")), Some(19.0));
}

#[test]
fn test_scenario_late_evening_wraps() {
    let s = Schedule::from_json_points(
        &[
            json!({"time": "08:00", "value": 20.0}),
            json!({"time": "20:00", "value": 18.0}),
        ],
        InterpolationMode::Continuous,
    );
    assert_eq!(evaluate(&s, t("23:00")), Some(18.5));
}

#[test]
fn test_scenario_stepped_hold_and_wrapping_change() {
    let s = Schedule::from_json_points(
        &[
            json!({"time": "00:00", "value": 0.0}),
            json!({"time": "18:00", "value": 1.0}),
        ],
        InterpolationMode::Stepped,
    );

    let result = evaluate_at(&s, t("20:00"));
    assert_eq!(result.current_value, Some(1.0));

    let change = result.next_change.unwrap();
    assert_eq!(change.at, t("00:00"));
    assert_eq!(change.minutes_until, 240);
    assert_eq!(change.value, 0.0);
}

#[test]
fn test_scenario_empty_schedule() {
    let s = Schedule::from_json_points(&[], InterpolationMode::Continuous);
    let result = evaluate_at(&s, t("12:00"));
    assert_eq!(result.current_value, None);
    assert_eq!(result.next_change, None);
}

#[test]
fn test_scenario_malformed_point_is_ignored() {
    let with_bad = Schedule::from_json_points(
        &[
            json!({"time": "25:99", "value": 30.0}),
            json!({"time": "09:00", "value": 19.0}),
        ],
        InterpolationMode::Continuous,
    );
    let only_good = Schedule::from_json_points(
        &[json!({"time": "09:00", "value": 19.0})],
        InterpolationMode::Continuous,
    );

    for q in all_minutes() {
        assert_eq!(evaluate(&with_bad, q), evaluate(&only_good, q));
    }
    assert_eq!(evaluate(&with_bad, t("03:00")), Some(19.0));
}

// ==================== Properties ====================

#[test]
fn test_knots_are_exact() {
    let s = thermostat_week_day();
    for point in s.points() {
        assert_eq!(evaluate(&s, point.time_of_day), Some(point.value));
    }
}

#[test]
fn test_continuous_has_no_jumps() {
    // Steepest segment is 06:30 -> 08:30, 2.5 degrees over 120 minutes
    let s = thermostat_week_day();
    let values: Vec<f64> = all_minutes().map(|q| evaluate(&s, q).unwrap()).collect();
    for window in values.windows(2) {
        assert!(
            (window[1] - window[0]).abs() <= 0.05,
            "jump from {} to {}",
            window[0],
            window[1]
        );
    }
    // Across midnight too
    assert!((values[0] - values[values.len() - 1]).abs() <= 0.05);
}

#[test]
fn test_evaluation_is_repeatable() {
    let s = thermostat_week_day();
    for q in all_minutes().step_by(13) {
        assert_eq!(evaluate(&s, q), evaluate(&s, q));
        assert_eq!(evaluate_at(&s, q), evaluate_at(&s, q));
    }
}

#[test]
fn test_midnight_bounds_use_wrap_brackets() {
    let s = thermostat_week_day();

    // 00:00 lies between 22:30 (17.0) and 06:30 (21.0): 90 of 480 minutes in
    let expected_midnight = 17.0 + (90.0 / 480.0) * 4.0;
    assert_eq!(evaluate(&s, t("00:00")), Some((expected_midnight * 100.0f64).round() / 100.0));

    // 23:59 lies between the same pair: 89 of 480 minutes in
    let expected_late = 17.0 + (89.0 / 480.0) * 4.0;
    assert_eq!(evaluate(&s, t("23:59")), Some((expected_late * 100.0f64).round() / 100.0));
}

#[test]
fn test_next_change_never_reports_current_value() {
    let s = Schedule::from_json_points(
        &[
            json!({"time": "06:00", "value": 1.0}),
            json!({"time": "08:00", "value": 0.0}),
            json!({"time": "17:00", "value": 1.0}),
            json!({"time": "23:00", "value": 0.0}),
        ],
        InterpolationMode::Stepped,
    );

    for q in all_minutes() {
        let current = evaluate(&s, q).unwrap();
        let change = next_change(&s, q, current).unwrap();
        assert_ne!(change.value, current);
        assert!(change.minutes_until >= 1 && change.minutes_until <= MINUTES_PER_DAY);
        assert_eq!(q.minutes_until(change.at), change.minutes_until);
    }
}

#[test]
fn test_flat_schedule_reports_no_change() {
    let s = Schedule::from_json_points(
        &[
            json!({"time": "00:00", "value": 4.5}),
            json!({"time": "12:00", "value": 4.5}),
        ],
        InterpolationMode::Continuous,
    );
    for q in all_minutes() {
        assert_eq!(evaluate_at(&s, q).next_change, None);
    }
}

//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "tests"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use skylapse_schedule::{
    ScheduleCalculator, ScheduleError, ScheduleMode, ScheduleSettings, SolarModel,
    SolarTimeProvider, SolarTimes,
};

#[derive(Debug)]
struct FixedSolar(SolarTimes);

impl SolarTimeProvider for FixedSolar {
    fn times_for(&self, _date: NaiveDate, _latitude: f64, _longitude: f64) -> SolarTimes {
        self.0
    }
}

fn settings(length: Duration) -> ScheduleSettings {
    ScheduleSettings {
        timelapse_length: length,
        sunrise_label: "Sunrise".into(),
        sunset_label: "Sunset".into(),
        test_offset: Duration::from_secs(5),
        test_length: Duration::from_secs(60),
        test_label: "Test".into(),
        latitude: 51.5074,
        longitude: -0.1278,
    }
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, h, m, 0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

fn fixed(sunrise: Option<DateTime<Utc>>, sunset: Option<DateTime<Utc>>) -> ScheduleCalculator {
    ScheduleCalculator::new(
        settings(Duration::from_secs(3600)),
        Arc::new(FixedSolar(SolarTimes { sunrise, sunset })),
    )
}

#[test]
fn solar_mode_centers_windows_on_events() {
    let calc = fixed(Some(utc(6, 30)), Some(utc(17, 45)));
    let windows = calc
        .windows(date(), utc(0, 0), &ScheduleMode::Solar)
        .unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].label(), "Sunrise");
    assert_eq!(windows[0].start(), utc(6, 0));
    assert_eq!(windows[0].end(), utc(7, 0));
    assert_eq!(windows[1].label(), "Sunset");
    assert_eq!(windows[1].start(), utc(17, 15));
    assert_eq!(windows[1].end(), utc(18, 15));
}

#[test]
fn window_already_started_is_skipped_not_clamped() {
    let calc = fixed(Some(utc(6, 30)), Some(utc(17, 45)));
    // Sunrise itself is still ahead but its window opened at 06:00.
    let windows = calc
        .windows(date(), utc(6, 10), &ScheduleMode::Solar)
        .unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].label(), "Sunset");
    assert_eq!(windows[0].start(), utc(17, 15));
}

#[test]
fn window_starting_exactly_now_is_skipped() {
    let calc = fixed(Some(utc(6, 30)), Some(utc(17, 45)));
    let windows = calc
        .windows(date(), utc(17, 15), &ScheduleMode::Solar)
        .unwrap();
    assert!(windows.is_empty());
}

#[test]
fn missing_solar_event_yields_remaining_window() {
    let calc = fixed(None, Some(utc(17, 45)));
    let windows = calc
        .windows(date(), utc(0, 0), &ScheduleMode::Solar)
        .unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].label(), "Sunset");
}

#[test]
fn test_mode_starts_five_seconds_out_for_one_minute() {
    let calc = fixed(None, None);
    let now = utc(12, 0);
    let windows = calc
        .windows(date(), now, &ScheduleMode::SingleTestWindow)
        .unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].label(), "Test");
    assert_eq!(windows[0].start(), now + chrono::Duration::seconds(5));
    assert_eq!(windows[0].end(), now + chrono::Duration::seconds(65));
}

#[test]
fn custom_mode_starts_immediately() {
    let calc = fixed(None, None);
    let now = utc(12, 0);
    let mode = ScheduleMode::CustomWindow {
        length: Duration::from_secs(25 * 60),
        label: "Storm".into(),
    };
    let windows = calc.windows(date(), now, &mode).unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start(), now);
    assert_eq!(windows[0].end(), utc(12, 25));
    assert_eq!(windows[0].label(), "Storm");
}

#[test]
fn custom_mode_rejects_empty_window() {
    let calc = fixed(None, None);
    let mode = ScheduleMode::CustomWindow {
        length: Duration::ZERO,
        label: "Empty".into(),
    };
    let err = calc.windows(date(), utc(12, 0), &mode).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { .. }));
}

#[test]
fn oversized_custom_length_is_an_error() {
    let calc = fixed(None, None);
    let mode = ScheduleMode::CustomWindow {
        length: Duration::from_secs(1_000_000_000_000 * 60),
        label: "Forever".into(),
    };
    let err = calc.windows(date(), utc(12, 0), &mode).unwrap_err();
    assert!(matches!(err, ScheduleError::LengthOutOfRange(_)));
}

#[test]
fn oversized_test_offset_is_an_error() {
    let mut settings = settings(Duration::from_secs(3600));
    settings.test_offset = Duration::from_secs(1_000_000_000_000 * 60);
    let calc = ScheduleCalculator::new(
        settings,
        Arc::new(FixedSolar(SolarTimes {
            sunrise: None,
            sunset: None,
        })),
    );
    let err = calc
        .windows(date(), utc(12, 0), &ScheduleMode::SingleTestWindow)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::LengthOutOfRange(_)));
}

#[test]
fn oversized_timelapse_length_is_an_error() {
    let calc = ScheduleCalculator::new(
        settings(Duration::from_secs(1_000_000_000_000 * 60)),
        Arc::new(FixedSolar(SolarTimes {
            sunrise: Some(utc(6, 30)),
            sunset: None,
        })),
    );
    let err = calc
        .windows(date(), utc(0, 0), &ScheduleMode::Solar)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::LengthOutOfRange(_)));
}

#[test]
fn identical_inputs_give_identical_windows() {
    let calc = ScheduleCalculator::new(settings(Duration::from_secs(5400)), Arc::new(SolarModel));
    let now = utc(0, 0);
    let first = calc.windows(date(), now, &ScheduleMode::Solar).unwrap();
    let second = calc.windows(date(), now, &ScheduleMode::Solar).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_solar_window_has_the_configured_length() {
    let length = Duration::from_secs(90 * 60 + 1);
    let calc = ScheduleCalculator::new(settings(length), Arc::new(SolarModel));
    let expected = chrono::Duration::from_std(length).unwrap();
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for offset in 0..366 {
        let reference = first + chrono::Duration::days(offset);
        let midnight = reference.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let now = midnight - chrono::Duration::hours(6);
        let windows = calc.windows(reference, now, &ScheduleMode::Solar).unwrap();
        assert_eq!(windows.len(), 2, "two windows expected on {}", reference);
        for window in &windows {
            assert!(window.start() < window.end());
            assert_eq!(window.length(), expected);
            assert!(window.start() > now);
        }
    }
}

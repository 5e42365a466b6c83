//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "tests"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Run driver sequencing, upload hand-off and exit criteria."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate};
use skylapse_common::config::NetworkConfig;
use skylapse_core::{resolve_switcher, DriverError, Orchestrator, RunContext, WindowOutcome};
use skylapse_schedule::{ScheduleCalculator, ScheduleMode, ScheduleSettings};
use skylapse_testharness::{FixedSolar, Harness, DEVICE_SSID, HOME_SSID};

use support::{context, delays, start_of_run};

fn settings() -> ScheduleSettings {
    ScheduleSettings {
        timelapse_length: Duration::from_secs(3600),
        sunrise_label: "Sunrise".into(),
        sunset_label: "Sunset".into(),
        test_offset: Duration::from_secs(5),
        test_length: Duration::from_secs(60),
        test_label: "Test".into(),
        latitude: 37.77,
        longitude: -122.42,
    }
}

/// Sunrise and sunset `hours` after the start of the run.
fn solar(sunrise_hours: i64, sunset_hours: i64) -> Arc<FixedSolar> {
    Arc::new(FixedSolar::new(
        start_of_run() + ChronoDuration::hours(sunrise_hours),
        start_of_run() + ChronoDuration::hours(sunset_hours),
    ))
}

fn orchestrator(ctx: RunContext, solar: Arc<FixedSolar>) -> Orchestrator {
    let mut ctx = ctx;
    ctx.timing.poll_interval = Duration::from_secs(30);
    Orchestrator::new(ctx, ScheduleCalculator::new(settings(), solar))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[tokio::test(start_paused = true)]
async fn solar_day_captures_and_uploads_both_windows() {
    let harness = Harness::new();
    harness.camera.with_range("100GOPRO", 1, 1, 2);
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12));

    let summary = driver.run(&ScheduleMode::Solar).await.expect("run completes");

    assert!(summary.is_success());
    assert_eq!(summary.date, date());
    assert_eq!(summary.windows.len(), 2);
    assert_eq!(
        summary.windows[0].destination,
        "/Timelapses/2024/03 March/5/Sunrise"
    );
    assert_eq!(
        summary.windows[1].destination,
        "/Timelapses/2024/03 March/5/Sunset"
    );
    // Media is produced once; the second window finds an empty card.
    assert_eq!(
        harness.cloud.stored(),
        vec![
            "/Timelapses/2024/03 March/5/Sunrise/G0010001.JPG",
            "/Timelapses/2024/03 March/5/Sunrise/G0010002.JPG",
        ]
    );
    assert_eq!(harness.log.count("wifi.connect HomeNet"), 2);
    assert!(std::fs::read_dir(staging.path()).unwrap().next().is_none());

    // Upload of the first window finishes before the second hand-off starts.
    let entries = harness.log.entries();
    let last_upload = entries
        .iter()
        .rposition(|entry| entry.starts_with("cloud.upload"))
        .unwrap();
    let second_scan = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.as_str() == "wifi.scan")
        .map(|(index, _)| index)
        .nth(2)
        .unwrap();
    assert!(last_upload < second_scan);
}

#[tokio::test(start_paused = true)]
async fn startup_check_fails_fast_when_camera_is_off() {
    let harness = Harness::new();
    harness.wifi.hide(DEVICE_SSID);
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12));

    let err = driver
        .run(&ScheduleMode::Solar)
        .await
        .expect_err("camera is off");
    assert!(matches!(err, DriverError::DeviceUnavailable(_)));
    assert_eq!(harness.log.entries(), vec!["wifi.scan"]);
}

#[tokio::test(start_paused = true)]
async fn startup_check_can_be_disabled() {
    let harness = Harness::new();
    harness.wifi.hide(DEVICE_SSID);
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12)).verify_on_startup(false);

    let summary = driver
        .run(&ScheduleMode::SingleTestWindow)
        .await
        .expect("run completes");
    assert!(!summary.is_success());
    assert!(matches!(
        summary.windows[0].outcome,
        WindowOutcome::Failed { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn failed_window_does_not_stop_the_next_one() {
    let harness = Harness::new();
    harness.camera.with_range("100GOPRO", 1, 1, 2);
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    harness.failures.fail_nth("camera.set_mode", 1);
    let driver = orchestrator(ctx, solar(2, 12));

    let summary = driver.run(&ScheduleMode::Solar).await.expect("run completes");

    assert!(!summary.is_success());
    assert_eq!(summary.failed_windows(), 1);
    assert!(matches!(
        summary.windows[0].outcome,
        WindowOutcome::Failed { .. }
    ));
    assert!(matches!(
        summary.windows[1].outcome,
        WindowOutcome::Captured { .. }
    ));
    assert_eq!(
        harness.cloud.stored(),
        vec![
            "/Timelapses/2024/03 March/5/Sunset/G0010001.JPG",
            "/Timelapses/2024/03 March/5/Sunset/G0010002.JPG",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn window_opening_during_previous_session_is_skipped() {
    let harness = Harness::new();
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    // The sunset window opens at 06:00 while the sunrise session runs to 06:30.
    let solar = Arc::new(FixedSolar::new(
        start_of_run() + ChronoDuration::hours(2),
        start_of_run() + ChronoDuration::minutes(150),
    ));
    let driver = orchestrator(ctx, solar);

    let summary = driver.run(&ScheduleMode::Solar).await.expect("run completes");

    assert!(summary.is_success());
    assert!(matches!(
        summary.windows[0].outcome,
        WindowOutcome::Captured { .. }
    ));
    assert!(matches!(
        summary.windows[1].outcome,
        WindowOutcome::Skipped { .. }
    ));
    assert_eq!(harness.log.count("wifi.connect HomeNet"), 1);
}

#[tokio::test(start_paused = true)]
async fn no_eligible_window_is_a_successful_empty_run() {
    let harness = Harness::new();
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(-6, 0));

    let summary = driver.run(&ScheduleMode::Solar).await.expect("run completes");
    assert!(summary.is_success());
    assert!(summary.windows.is_empty());
    assert_eq!(harness.log.position("camera."), None);
}

#[tokio::test(start_paused = true)]
async fn rejected_uploads_stay_in_staging_without_failing_the_run() {
    let harness = Harness::new();
    harness.camera.with_range("100GOPRO", 1, 1, 3);
    harness.cloud.reject("G0010002.JPG");
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12));

    let summary = driver
        .run(&ScheduleMode::CustomWindow {
            length: Duration::from_secs(600),
            label: "Storm".into(),
        })
        .await
        .expect("run completes");

    assert!(summary.is_success());
    assert_eq!(summary.files_left_in_staging(), 1);
    assert!(staging.path().join("G0010002.JPG").exists());
    assert!(!staging.path().join("G0010001.JPG").exists());
    assert_eq!(
        summary.windows[0].destination,
        "/Timelapses/2024/03 March/5/Storm"
    );
}

#[tokio::test(start_paused = true)]
async fn manual_upload_pass_drains_staging() {
    let harness = Harness::new();
    let staging = tempfile::tempdir().unwrap();
    for name in ["G0010001.JPG", "G0010002.JPG"] {
        std::fs::write(staging.path().join(name), b"frame").unwrap();
    }
    std::fs::create_dir(staging.path().join("nested")).unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12));

    let report = driver
        .upload_staged(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), "Sunset")
        .await
        .expect("upload pass runs");

    assert!(report.is_success());
    assert_eq!(report.total(), 2);
    assert_eq!(
        harness.cloud.stored(),
        vec![
            "/Timelapses/2024/03 March/4/Sunset/G0010001.JPG",
            "/Timelapses/2024/03 March/4/Sunset/G0010002.JPG",
        ]
    );
    assert!(staging.path().join("nested").is_dir());
}

#[tokio::test(start_paused = true)]
async fn plan_has_no_side_effects() {
    let harness = Harness::new();
    let staging = tempfile::tempdir().unwrap();
    let (ctx, _clock) = context(&harness, staging.path()).await;
    let driver = orchestrator(ctx, solar(2, 12));

    let windows = driver.plan(&ScheduleMode::Solar).expect("plan");
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].label(), "Sunrise");
    assert!(harness.log.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unknown_ssid_is_a_configuration_error() {
    let harness = Harness::new();
    let network = NetworkConfig {
        home_ssid: HOME_SSID.into(),
        device_ssid: "GP00000".into(),
        interface: "wlan0".into(),
        verify_on_startup: true,
    };
    let err = resolve_switcher(harness.wifi.clone(), &network, delays())
        .await
        .expect_err("ssid is not saved");
    assert!(matches!(err, DriverError::Configuration(_)));
}

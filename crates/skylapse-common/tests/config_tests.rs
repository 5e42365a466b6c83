//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "tests"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Configuration parsing and validation tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::time::Duration;

use skylapse_common::config::{AppConfig, CameraSetting};
use skylapse_common::LogFormat;

const MINIMAL: &str = r#"
[network]
home_ssid = "HomeNet"
device_ssid = "GP54321"

[location]
latitude = 51.5
longitude = -0.12
"#;

#[test]
fn minimal_config_fills_defaults() {
    let config: AppConfig = MINIMAL.parse().expect("minimal config parses");
    assert_eq!(config.network.interface, "wlan0");
    assert!(config.network.verify_on_startup);
    assert_eq!(config.schedule.timelapse_length, Duration::from_secs(3600));
    assert_eq!(config.schedule.sunrise_label, "Sunrise");
    assert_eq!(config.timing.after_disconnect, Duration::from_secs(1));
    assert_eq!(config.timing.after_device_connect, Duration::from_secs(20));
    assert_eq!(config.timing.after_home_connect, Duration::from_secs(15));
    assert_eq!(config.timing.poll_interval, Duration::from_secs(1));
    assert_eq!(config.upload.max_concurrent, 10);
    assert_eq!(config.upload.concurrency_limit(), Some(10));
    assert_eq!(config.upload.root, "/Timelapses");
    assert_eq!(config.camera.settings.len(), 2);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn explicit_sections_override_defaults() {
    let content = format!(
        "{}\n{}",
        MINIMAL,
        r#"
[schedule]
timelapse_length = 5400
sunset_label = "Dusk"

[timing]
after_device_connect = 30

[camera]
mac = "d4:d9:19:aa:bb:cc"
settings = [{ key = 32, value = 20 }]

[upload]
root = "/Archive"
max_concurrent = 3

[logging]
format = "structured-json"
"#
    );
    let config: AppConfig = content.parse().expect("config parses");
    assert_eq!(config.schedule.timelapse_length, Duration::from_secs(5400));
    assert_eq!(config.schedule.sunset_label, "Dusk");
    assert_eq!(config.schedule.sunrise_label, "Sunrise");
    assert_eq!(config.timing.after_device_connect, Duration::from_secs(30));
    assert_eq!(config.camera.mac.as_deref(), Some("d4:d9:19:aa:bb:cc"));
    assert_eq!(
        config.camera.settings,
        vec![CameraSetting { key: 32, value: 20 }]
    );
    assert_eq!(config.upload.root, "/Archive");
    assert_eq!(config.upload.concurrency_limit(), Some(3));
    assert_eq!(config.logging.format, LogFormat::StructuredJson);
}

#[test]
fn identical_ssids_are_rejected() {
    let content = MINIMAL.replace("GP54321", "HomeNet");
    let err = content.parse::<AppConfig>().expect_err("expected failure");
    assert!(format!("{:#}", err).contains("must differ"));
}

#[test]
fn out_of_range_latitude_is_rejected() {
    let content = MINIMAL.replace("latitude = 51.5", "latitude = 123.0");
    let err = content.parse::<AppConfig>().expect_err("expected failure");
    assert!(format!("{:#}", err).contains("latitude"));
}

#[test]
fn zero_concurrency_means_unlimited_uploads() {
    let content = format!("{}\n[upload]\nmax_concurrent = 0\n", MINIMAL);
    let config: AppConfig = content.parse().expect("config parses");
    assert_eq!(config.upload.max_concurrent, 0);
    assert_eq!(config.upload.concurrency_limit(), None);
}

#[test]
fn empty_token_env_is_rejected() {
    let content = format!("{}\n[upload]\ntoken_env = \"\"\n", MINIMAL);
    let err = content.parse::<AppConfig>().expect_err("expected failure");
    assert!(format!("{:#}", err).contains("token_env"));
}

#[test]
fn oversized_schedule_spans_are_rejected() {
    for field in ["timelapse_length", "test_offset", "test_length"] {
        let content = format!("{}\n[schedule]\n{} = 60000000000000\n", MINIMAL, field);
        let err = content.parse::<AppConfig>().expect_err("expected failure");
        assert!(format!("{:#}", err).contains(field), "{} accepted", field);
    }
}

#[test]
fn load_with_source_picks_first_existing_candidate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.toml");
    let present = dir.path().join("skylapse.toml");
    std::fs::write(&present, MINIMAL).expect("write config");

    let loaded = AppConfig::load_with_source(&[missing, present.clone()]).expect("load");
    assert_eq!(loaded.source, present);
    assert_eq!(loaded.config.network.device_ssid, "GP54321");
}

#[test]
fn load_without_candidates_lists_inspected_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    let err = AppConfig::load(&[missing]).expect_err("expected failure");
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn shipped_example_config_is_valid() {
    let config: AppConfig = include_str!("../../../configs/skylapse.toml")
        .parse()
        .expect("example config parses");
    assert_eq!(config.network.device_ssid, "GP54321");
    assert_eq!(config.timing.scan_wait, Duration::from_secs(3));
    assert_eq!(config.camera.mac, None);
    assert_eq!(config.staging.directory, std::path::PathBuf::from("buffer"));
}

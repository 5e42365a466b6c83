//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Shared primitives and utilities for the timelapse runtime."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

/// Longest window or test offset a schedule may ask for.
pub const MAX_SCHEDULE_SPAN: Duration = Duration::from_secs(24 * 60 * 60);

fn default_interface() -> String {
    "wlan0".to_owned()
}

fn default_verify_on_startup() -> bool {
    true
}

fn default_timelapse_length() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_sunrise_label() -> String {
    "Sunrise".to_owned()
}

fn default_sunset_label() -> String {
    "Sunset".to_owned()
}

fn default_test_offset() -> Duration {
    Duration::from_secs(5)
}

fn default_test_length() -> Duration {
    Duration::from_secs(60)
}

fn default_test_label() -> String {
    "Test".to_owned()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_after_disconnect() -> Duration {
    Duration::from_secs(1)
}

fn default_after_device_connect() -> Duration {
    Duration::from_secs(20)
}

fn default_after_home_connect() -> Duration {
    Duration::from_secs(15)
}

fn default_after_command() -> Duration {
    Duration::from_secs(1)
}

fn default_scan_wait() -> Duration {
    Duration::from_secs(3)
}

fn default_camera_address() -> String {
    "10.5.5.9".to_owned()
}

fn default_media_port() -> u16 {
    8080
}

// Multishot / NightLapse on HERO4-class cameras.
fn default_camera_mode() -> u32 {
    2
}

fn default_camera_submode() -> u32 {
    2
}

fn default_camera_settings() -> Vec<CameraSetting> {
    vec![
        // NightLapse interval: 10 seconds.
        CameraSetting { key: 32, value: 10 },
        // NightLapse exposure: auto.
        CameraSetting { key: 31, value: 0 },
    ]
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_upload_root() -> String {
    "/Timelapses".to_owned()
}

fn default_max_concurrent() -> usize {
    10
}

fn default_token_env() -> String {
    "DROPBOX_TOKEN".to_owned()
}

fn default_upload_endpoint() -> String {
    "https://content.dropboxapi.com/2/files/upload".to_owned()
}

fn default_staging_directory() -> PathBuf {
    PathBuf::from("buffer")
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for the timelapse runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub location: LocationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "SKYLAPSE_CONFIG";

    /// Load configuration from disk, respecting the `SKYLAPSE_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.location.validate()?;
        self.schedule.validate()?;
        self.timing.validate()?;
        self.upload.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Home and camera network identities plus the adapter to drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub home_ssid: String,
    pub device_ssid: String,
    #[serde(default = "default_interface")]
    pub interface: String,
    #[serde(default = "default_verify_on_startup")]
    pub verify_on_startup: bool,
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.home_ssid.trim().is_empty() {
            return Err(anyhow!("network.home_ssid must not be empty"));
        }
        if self.device_ssid.trim().is_empty() {
            return Err(anyhow!("network.device_ssid must not be empty"));
        }
        if self.home_ssid == self.device_ssid {
            return Err(anyhow!(
                "network.home_ssid and network.device_ssid must differ (both '{}')",
                self.home_ssid
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(anyhow!("location.latitude {} out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(anyhow!(
                "location.longitude {} out of range",
                self.longitude
            ));
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_timelapse_length")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timelapse_length: Duration,
    #[serde(default = "default_sunrise_label")]
    pub sunrise_label: String,
    #[serde(default = "default_sunset_label")]
    pub sunset_label: String,
    #[serde(default = "default_test_offset")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub test_offset: Duration,
    #[serde(default = "default_test_length")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub test_length: Duration,
    #[serde(default = "default_test_label")]
    pub test_label: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timelapse_length: default_timelapse_length(),
            sunrise_label: default_sunrise_label(),
            sunset_label: default_sunset_label(),
            test_offset: default_test_offset(),
            test_length: default_test_length(),
            test_label: default_test_label(),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timelapse_length.is_zero() {
            return Err(anyhow!("schedule.timelapse_length must be positive"));
        }
        if self.test_length.is_zero() {
            return Err(anyhow!("schedule.test_length must be positive"));
        }
        for (name, value) in [
            ("timelapse_length", self.timelapse_length),
            ("test_offset", self.test_offset),
            ("test_length", self.test_length),
        ] {
            if value > MAX_SCHEDULE_SPAN {
                return Err(anyhow!(
                    "schedule.{} must not exceed {} seconds",
                    name,
                    MAX_SCHEDULE_SPAN.as_secs()
                ));
            }
        }
        Ok(())
    }
}

/// Settle delays and polling cadence.
///
/// The defaults were measured against a HERO4 camera and a Raspberry Pi
/// adapter; other hardware may need longer association delays.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_poll_interval")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub poll_interval: Duration,
    #[serde(default = "default_after_disconnect")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub after_disconnect: Duration,
    #[serde(default = "default_after_device_connect")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub after_device_connect: Duration,
    #[serde(default = "default_after_home_connect")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub after_home_connect: Duration,
    #[serde(default = "default_after_command")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub after_command: Duration,
    #[serde(default = "default_scan_wait")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub scan_wait: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            after_disconnect: default_after_disconnect(),
            after_device_connect: default_after_device_connect(),
            after_home_connect: default_after_home_connect(),
            after_command: default_after_command(),
            scan_wait: default_scan_wait(),
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(anyhow!("timing.poll_interval must be positive"));
        }
        Ok(())
    }
}

/// A single `setting/<key>/<value>` command applied while configuring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraSetting {
    pub key: u32,
    pub value: u32,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_address")]
    pub address: String,
    #[serde(default = "default_media_port")]
    pub media_port: u16,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default = "default_camera_mode")]
    pub mode: u32,
    #[serde(default = "default_camera_submode")]
    pub submode: u32,
    /// Applied in order after the mode switch.
    #[serde(default = "default_camera_settings")]
    pub settings: Vec<CameraSetting>,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub power_off_after_capture: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            address: default_camera_address(),
            media_port: default_media_port(),
            mac: None,
            mode: default_camera_mode(),
            submode: default_camera_submode(),
            settings: default_camera_settings(),
            request_timeout: default_request_timeout(),
            power_off_after_capture: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_root")]
    pub root: String,
    /// Concurrent transfer cap; `0` attempts every transfer at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: default_upload_root(),
            max_concurrent: default_max_concurrent(),
            token_env: default_token_env(),
            endpoint: default_upload_endpoint(),
        }
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_env.trim().is_empty() {
            return Err(anyhow!("upload.token_env must name an environment variable"));
        }
        Ok(())
    }

    /// Transfer cap handed to the upload scheduler; `None` means unlimited.
    pub fn concurrency_limit(&self) -> Option<usize> {
        Some(self.max_concurrent).filter(|limit| *limit > 0)
    }

    /// Read the cloud token from the configured environment variable.
    pub fn token(&self) -> Result<String> {
        std::env::var(&self.token_env)
            .map_err(|_| anyhow!("environment variable {} is not set", self.token_env))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    #[serde(default = "default_staging_directory")]
    pub directory: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            directory: default_staging_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

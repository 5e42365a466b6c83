//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use skylapse_camera::CameraControl;
use skylapse_common::config::{CameraConfig, CameraSetting, TimingConfig};
use skylapse_net::NetworkSwitcher;
use skylapse_rt::Clock;
use skylapse_upload::UploadScheduler;

/// Mode and settings applied to the camera before every capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraProfile {
    pub mode: u32,
    pub submode: u32,
    /// Applied in order, after the mode switch.
    pub settings: Vec<CameraSetting>,
    pub power_off_after_capture: bool,
}

impl CameraProfile {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            mode: config.mode,
            submode: config.submode,
            settings: config.settings.clone(),
            power_off_after_capture: config.power_off_after_capture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Re-check interval while waiting for a window boundary.
    pub poll_interval: Duration,
    /// Settle delay after each camera command.
    pub after_command: Duration,
}

impl SessionTiming {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            poll_interval: timing.poll_interval,
            after_command: timing.after_command,
        }
    }
}

/// Everything a run needs, built once at start-up and passed by reference.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub switcher: NetworkSwitcher,
    pub camera: Arc<dyn CameraControl>,
    pub clock: Arc<dyn Clock>,
    pub timing: SessionTiming,
    pub profile: CameraProfile,
    pub staging: PathBuf,
    pub uploader: UploadScheduler,
    pub upload_root: String,
}

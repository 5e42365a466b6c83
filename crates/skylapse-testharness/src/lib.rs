//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Scripted collaborators for exercising capture sessions without hardware.
//!
//! Every fake appends to one shared [`CallLog`], so a test can assert the
//! exact interleaving of wifi, camera and cloud calls. A [`FailurePlan`]
//! makes any named operation fail on demand.

mod camera;
mod cloud;
mod log;
mod solar;
mod wifi;

pub use camera::FakeCamera;
pub use cloud::FakeCloud;
pub use log::{CallLog, FailurePlan};
pub use solar::FixedSolar;
pub use wifi::FakeWifi;

pub const HOME_SSID: &str = "HomeNet";
pub const DEVICE_SSID: &str = "GP54321";

/// One log and failure plan wired into a full set of fakes.
#[derive(Debug, Clone)]
pub struct Harness {
    pub log: CallLog,
    pub failures: FailurePlan,
    pub wifi: std::sync::Arc<FakeWifi>,
    pub camera: std::sync::Arc<FakeCamera>,
    pub cloud: std::sync::Arc<FakeCloud>,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        let failures = FailurePlan::default();
        Self {
            wifi: std::sync::Arc::new(FakeWifi::new(
                log.clone(),
                failures.clone(),
                &[HOME_SSID, DEVICE_SSID],
            )),
            camera: std::sync::Arc::new(FakeCamera::new(log.clone(), failures.clone())),
            cloud: std::sync::Arc::new(FakeCloud::new(log.clone(), failures.clone())),
            log,
            failures,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

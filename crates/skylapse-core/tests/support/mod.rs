//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "tests"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Shared fixtures wiring the scripted fakes into a run context."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use skylapse_common::config::CameraSetting;
use skylapse_core::{CameraProfile, RunContext, SessionTiming};
use skylapse_net::{NetworkSwitcher, SettleDelays};
use skylapse_rt::AnchoredClock;
use skylapse_testharness::{Harness, DEVICE_SSID, HOME_SSID};
use skylapse_upload::UploadScheduler;

pub const UPLOAD_ROOT: &str = "/Timelapses";

pub fn start_of_run() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 4, 0, 0).unwrap()
}

pub fn delays() -> SettleDelays {
    SettleDelays {
        after_disconnect: Duration::from_secs(1),
        after_device_connect: Duration::from_secs(20),
        after_home_connect: Duration::from_secs(15),
    }
}

pub fn profile() -> CameraProfile {
    CameraProfile {
        mode: 2,
        submode: 2,
        settings: vec![
            CameraSetting { key: 32, value: 10 },
            CameraSetting { key: 31, value: 0 },
        ],
        power_off_after_capture: false,
    }
}

pub async fn switcher(harness: &Harness) -> NetworkSwitcher {
    NetworkSwitcher::resolve(harness.wifi.clone(), HOME_SSID, DEVICE_SSID, delays())
        .await
        .expect("profiles resolve")
}

/// Context over the harness fakes with a clock anchored at [`start_of_run`].
pub async fn context(harness: &Harness, staging: &Path) -> (RunContext, Arc<AnchoredClock>) {
    let clock = Arc::new(AnchoredClock::new(start_of_run()));
    let ctx = RunContext {
        switcher: switcher(harness).await,
        camera: harness.camera.clone(),
        clock: clock.clone(),
        timing: SessionTiming {
            poll_interval: Duration::from_secs(1),
            after_command: Duration::from_secs(1),
        },
        profile: profile(),
        staging: staging.to_path_buf(),
        uploader: UploadScheduler::new(harness.cloud.clone()).with_concurrency(Some(10)),
        upload_root: UPLOAD_ROOT.to_owned(),
    };
    harness.log.clear();
    (ctx, clock)
}

//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::media::MediaDirectory;

/// Structured device state as reported by the camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraStatus(pub serde_json::Value);

impl CameraStatus {
    /// Look up `section.key`, e.g. `status.8` for the busy flag.
    pub fn field(&self, section: &str, key: &str) -> Option<&serde_json::Value> {
        self.0.get(section).and_then(|section| section.get(key))
    }

    /// True when the camera reports an active capture.
    pub fn is_busy(&self) -> bool {
        self.field("status", "8")
            .and_then(serde_json::Value::as_i64)
            .map(|flag| flag != 0)
            .unwrap_or(false)
    }
}

/// Operations a capture session needs from the camera.
///
/// Calls are issued strictly in sequence by one session at a time.
#[async_trait]
pub trait CameraControl: Debug + Send + Sync {
    async fn power_on(&self) -> Result<(), CameraError>;

    async fn status(&self) -> Result<CameraStatus, CameraError>;

    async fn set_mode(&self, mode: u32, submode: u32) -> Result<(), CameraError>;

    async fn set_setting(&self, key: u32, value: u32) -> Result<(), CameraError>;

    async fn start_capture(&self) -> Result<(), CameraError>;

    async fn stop_capture(&self) -> Result<(), CameraError>;

    async fn list_media(&self) -> Result<Vec<MediaDirectory>, CameraError>;

    /// Copy one file off the device into `destination`, returning the bytes written.
    async fn retrieve_file(
        &self,
        directory: &str,
        filename: &str,
        destination: &Path,
    ) -> Result<u64, CameraError>;

    async fn delete_all_media(&self) -> Result<(), CameraError>;

    async fn power_off(&self) -> Result<(), CameraError>;
}

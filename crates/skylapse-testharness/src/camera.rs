//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use skylapse_camera::{CameraControl, CameraError, CameraStatus, MediaDirectory, MediaItem};

use crate::log::{CallLog, FailurePlan};

/// Camera whose media card holds whatever the test puts there.
#[derive(Debug)]
pub struct FakeCamera {
    log: CallLog,
    failures: FailurePlan,
    media: Mutex<Vec<MediaDirectory>>,
    capturing: Mutex<bool>,
}

impl FakeCamera {
    pub fn new(log: CallLog, failures: FailurePlan) -> Self {
        Self {
            log,
            failures,
            media: Mutex::new(Vec::new()),
            capturing: Mutex::new(false),
        }
    }

    /// Add a frame range that capture will "produce".
    pub fn with_range(&self, directory: &str, header: u32, first: u32, last: u32) {
        let mut media = self.media.lock();
        let item = MediaItem {
            header,
            first,
            last,
        };
        match media.iter_mut().find(|entry| entry.directory == directory) {
            Some(entry) => entry.ranges.push(item),
            None => media.push(MediaDirectory {
                directory: directory.to_owned(),
                ranges: vec![item],
                files: Vec::new(),
            }),
        }
    }

    pub fn media_count(&self) -> usize {
        self.media.lock().iter().map(MediaDirectory::file_count).sum()
    }

    pub fn is_capturing(&self) -> bool {
        *self.capturing.lock()
    }

    fn call(&self, operation: &'static str, entry: String) -> Result<(), CameraError> {
        self.log.record(entry);
        if self.failures.should_fail(operation) {
            return Err(CameraError::device(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CameraControl for FakeCamera {
    async fn power_on(&self) -> Result<(), CameraError> {
        self.call("camera.power_on", "camera.power_on".into())
    }

    async fn status(&self) -> Result<CameraStatus, CameraError> {
        self.call("camera.status", "camera.status".into())?;
        let busy = i64::from(self.is_capturing());
        Ok(CameraStatus(serde_json::json!({ "status": { "8": busy } })))
    }

    async fn set_mode(&self, mode: u32, submode: u32) -> Result<(), CameraError> {
        self.call("camera.set_mode", format!("camera.set_mode {}/{}", mode, submode))
    }

    async fn set_setting(&self, key: u32, value: u32) -> Result<(), CameraError> {
        self.call(
            "camera.set_setting",
            format!("camera.set_setting {}={}", key, value),
        )
    }

    async fn start_capture(&self) -> Result<(), CameraError> {
        self.call("camera.start_capture", "camera.start_capture".into())?;
        *self.capturing.lock() = true;
        Ok(())
    }

    async fn stop_capture(&self) -> Result<(), CameraError> {
        self.call("camera.stop_capture", "camera.stop_capture".into())?;
        *self.capturing.lock() = false;
        Ok(())
    }

    async fn list_media(&self) -> Result<Vec<MediaDirectory>, CameraError> {
        self.call("camera.list_media", "camera.list_media".into())?;
        Ok(self.media.lock().clone())
    }

    async fn retrieve_file(
        &self,
        directory: &str,
        filename: &str,
        destination: &Path,
    ) -> Result<u64, CameraError> {
        self.call(
            "camera.retrieve_file",
            format!("camera.retrieve_file {}/{}", directory, filename),
        )?;
        let body = format!("{}/{}", directory, filename).into_bytes();
        tokio::fs::write(destination, &body)
            .await
            .map_err(|source| CameraError::Io {
                path: destination.to_path_buf(),
                source,
            })?;
        Ok(body.len() as u64)
    }

    async fn delete_all_media(&self) -> Result<(), CameraError> {
        self.call("camera.delete_all", "camera.delete_all".into())?;
        self.media.lock().clear();
        Ok(())
    }

    async fn power_off(&self) -> Result<(), CameraError> {
        self.call("camera.power_off", "camera.power_off".into())
    }
}

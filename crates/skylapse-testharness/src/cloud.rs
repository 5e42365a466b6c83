//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use skylapse_upload::{CloudStorage, UploadError};

use crate::log::{CallLog, FailurePlan};

/// Cloud storage that remembers every accepted remote path.
#[derive(Debug)]
pub struct FakeCloud {
    log: CallLog,
    failures: FailurePlan,
    rejected: Mutex<HashSet<String>>,
    stored: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn new(log: CallLog, failures: FailurePlan) -> Self {
        Self {
            log,
            failures,
            rejected: Mutex::new(HashSet::new()),
            stored: Mutex::new(Vec::new()),
        }
    }

    /// Reject uploads of files named `filename`.
    pub fn reject(&self, filename: &str) {
        self.rejected.lock().insert(filename.to_owned());
    }

    pub fn stored(&self) -> Vec<String> {
        let mut stored = self.stored.lock().clone();
        stored.sort();
        stored
    }
}

#[async_trait]
impl CloudStorage for FakeCloud {
    async fn upload(&self, local: &Path, remote: &str) -> Result<(), UploadError> {
        self.log.record(format!("cloud.upload {}", remote));
        let filename = local
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if self.failures.should_fail("cloud.upload") || self.rejected.lock().contains(filename) {
            return Err(UploadError::Remote {
                remote: remote.to_owned(),
                message: "injected failure".to_owned(),
            });
        }
        tokio::fs::metadata(local)
            .await
            .map_err(|source| UploadError::Io {
                path: local.to_path_buf(),
                source,
            })?;
        self.stored.lock().push(remote.to_owned());
        Ok(())
    }
}

//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Uploading,
    /// Remote copy acknowledged and the local file removed.
    UploadedAndDeleted,
    /// Local file retained for a later pass.
    Failed { reason: String },
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::UploadedAndDeleted | TaskState::Failed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadTask {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub state: TaskState,
}

impl UploadTask {
    pub fn new(local_path: PathBuf, remote_path: String) -> Self {
        Self {
            local_path,
            remote_path,
            state: TaskState::Pending,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == TaskState::UploadedAndDeleted
    }
}

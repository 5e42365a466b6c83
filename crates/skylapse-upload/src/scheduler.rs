//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::destination::RemoteDestination;
use crate::error::UploadError;
use crate::storage::CloudStorage;
use crate::task::{TaskState, UploadTask};

/// Final state of every task in a batch, in submission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub tasks: Vec<UploadTask>,
}

impl UploadReport {
    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn uploaded(&self) -> usize {
        self.tasks.iter().filter(|task| task.succeeded()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks
            .iter()
            .filter(|task| matches!(task.state, TaskState::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.tasks.iter().all(UploadTask::succeeded)
    }
}

/// Bounded fan-out of file transfers to a [`CloudStorage`] backend.
#[derive(Debug, Clone)]
pub struct UploadScheduler {
    storage: Arc<dyn CloudStorage>,
    concurrency: Option<usize>,
}

impl UploadScheduler {
    /// Unlimited concurrency until [`Self::with_concurrency`] caps it.
    pub fn new(storage: Arc<dyn CloudStorage>) -> Self {
        Self {
            storage,
            concurrency: None,
        }
    }

    /// `None` or `Some(0)` attempt every transfer at once.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit.filter(|limit| *limit > 0);
        self
    }

    pub fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }

    /// Upload `files` into `destination`.
    ///
    /// Every file is attempted. A file is deleted locally only after its
    /// upload succeeds; `progress` receives `(completed, total)` after each
    /// transfer finishes, in completion order.
    pub async fn upload<F>(
        &self,
        files: Vec<PathBuf>,
        destination: &RemoteDestination,
        mut progress: F,
    ) -> UploadReport
    where
        F: FnMut(usize, usize),
    {
        let total = files.len();
        let limit = self.concurrency.unwrap_or(total).max(1);
        info!(files = total, %destination, limit, "starting upload");

        let mut tasks: Vec<UploadTask> = Vec::with_capacity(total);
        for local in files {
            let remote = match file_name(&local) {
                Ok(name) => destination.join(&name),
                Err(err) => {
                    warn!(path = %local.display(), error = %err, "skipping file");
                    let mut task = UploadTask::new(local, String::new());
                    task.state = TaskState::Failed {
                        reason: err.to_string(),
                    };
                    tasks.push(task);
                    continue;
                }
            };
            tasks.push(UploadTask::new(local, remote));
        }

        // Unnamed files are finished before any transfer starts.
        let mut completed = 0;
        for task in &tasks {
            if task.state.is_terminal() {
                completed += 1;
                progress(completed, total);
            }
        }

        let mut queue = tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.state == TaskState::Pending)
            .map(|(index, _)| index)
            .collect::<Vec<_>>()
            .into_iter();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < limit {
                let Some(index) = queue.next() else { break };
                let task = &mut tasks[index];
                task.state = TaskState::Uploading;
                debug!(local = %task.local_path.display(), remote = %task.remote_path, "transfer admitted");
                let storage = Arc::clone(&self.storage);
                let local = task.local_path.clone();
                let remote = task.remote_path.clone();
                in_flight.push(async move { (index, transfer(storage, local, remote).await) });
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };
            let task = &mut tasks[index];
            match result {
                Ok(()) => {
                    info!(remote = %task.remote_path, "uploaded and removed local copy");
                    task.state = TaskState::UploadedAndDeleted;
                }
                Err(err) => {
                    warn!(local = %task.local_path.display(), error = %err, "upload failed; keeping local copy");
                    task.state = TaskState::Failed {
                        reason: err.to_string(),
                    };
                }
            }
            completed += 1;
            progress(completed, total);
            debug!(remaining = total - completed, "upload progress");
        }

        let report = UploadReport { tasks };
        info!(
            uploaded = report.uploaded(),
            failed = report.failed().count(),
            total,
            "upload finished"
        );
        report
    }
}

async fn transfer(
    storage: Arc<dyn CloudStorage>,
    local: PathBuf,
    remote: String,
) -> Result<(), UploadError> {
    storage.upload(&local, &remote).await?;
    tokio::fs::remove_file(&local)
        .await
        .map_err(|source| UploadError::Io {
            path: local.clone(),
            source,
        })
}

fn file_name(path: &Path) -> Result<String, UploadError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| UploadError::InvalidPath {
            path: path.to_path_buf(),
        })
}

//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::Path;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use skylapse_common::config::NetworkConfig;
use skylapse_net::{NetworkSwitcher, SettleDelays, WifiControl};
use skylapse_schedule::{CaptureWindow, ScheduleCalculator, ScheduleMode};
use skylapse_upload::{RemoteDestination, UploadReport, UploadScheduler};
use tracing::{error, info, warn};

use crate::context::RunContext;
use crate::error::DriverError;
use crate::phase::SessionPhase;
use crate::session::{CaptureSession, SessionReport};
use crate::staging;

/// Resolve both network profiles against the adapter's saved networks.
pub async fn resolve_switcher(
    wifi: Arc<dyn WifiControl>,
    network: &NetworkConfig,
    delays: SettleDelays,
) -> Result<NetworkSwitcher, DriverError> {
    Ok(NetworkSwitcher::resolve(wifi, &network.home_ssid, &network.device_ssid, delays).await?)
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WindowOutcome {
    Captured {
        session: SessionReport,
        upload: UploadReport,
    },
    Failed {
        phase: SessionPhase,
        error: String,
    },
    /// The window opened while an earlier one was still running.
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSummary {
    pub window: CaptureWindow,
    pub destination: String,
    #[serde(flatten)]
    pub outcome: WindowOutcome,
}

/// Per-window results of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub windows: Vec<WindowSummary>,
}

impl RunSummary {
    /// True unless a capture session failed. Upload failures do not count.
    pub fn is_success(&self) -> bool {
        !self
            .windows
            .iter()
            .any(|window| matches!(window.outcome, WindowOutcome::Failed { .. }))
    }

    pub fn failed_windows(&self) -> usize {
        self.windows
            .iter()
            .filter(|window| matches!(window.outcome, WindowOutcome::Failed { .. }))
            .count()
    }

    pub fn files_left_in_staging(&self) -> usize {
        self.windows
            .iter()
            .map(|window| match &window.outcome {
                WindowOutcome::Captured { upload, .. } => upload.failed().count(),
                _ => 0,
            })
            .sum()
    }
}

/// Runs the day's capture windows one after another.
#[derive(Debug)]
pub struct Orchestrator {
    ctx: RunContext,
    calculator: ScheduleCalculator,
    verify_on_startup: bool,
    utc_offset: FixedOffset,
}

impl Orchestrator {
    pub fn new(ctx: RunContext, calculator: ScheduleCalculator) -> Self {
        Self {
            ctx,
            calculator,
            verify_on_startup: true,
            utc_offset: Utc.fix(),
        }
    }

    /// Check that the camera network broadcasts before any window is attempted.
    pub fn verify_on_startup(mut self, enabled: bool) -> Self {
        self.verify_on_startup = enabled;
        self
    }

    /// Offset used to derive the calendar date of a run.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Today's date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.ctx
            .clock
            .now()
            .with_timezone(&self.utc_offset)
            .date_naive()
    }

    /// Windows the run would capture, evaluated now. No side effects.
    pub fn plan(&self, mode: &ScheduleMode) -> Result<Vec<CaptureWindow>, DriverError> {
        let now = self.ctx.clock.now();
        Ok(self.calculator.windows(self.today(), now, mode)?)
    }

    /// Capture every eligible window for today and upload each one's media.
    pub async fn run(&self, mode: &ScheduleMode) -> Result<RunSummary, DriverError> {
        let ctx = &self.ctx;
        if self.verify_on_startup {
            let device = ctx.switcher.device().ssid.clone();
            ctx.switcher.verify_presence(&device).await?;
        }
        staging::ensure(&ctx.staging)
            .await
            .map_err(|source| DriverError::Staging {
                path: ctx.staging.clone(),
                source,
            })?;

        let date = self.today();
        let windows = self.plan(mode)?;
        if windows.is_empty() {
            info!(%date, "no capture window is still ahead today");
        }
        for window in &windows {
            info!(window = %window, "scheduled");
        }

        let mut summaries = Vec::with_capacity(windows.len());
        for window in windows {
            let destination = RemoteDestination::new(&ctx.upload_root, date, window.label());
            let outcome = self.capture_window(mode, &window, &destination).await?;
            summaries.push(WindowSummary {
                window,
                destination: destination.to_string(),
                outcome,
            });
        }

        let summary = RunSummary {
            date,
            windows: summaries,
        };
        info!(
            windows = summary.windows.len(),
            failed = summary.failed_windows(),
            left_in_staging = summary.files_left_in_staging(),
            "run complete"
        );
        Ok(summary)
    }

    async fn capture_window(
        &self,
        mode: &ScheduleMode,
        window: &CaptureWindow,
        destination: &RemoteDestination,
    ) -> Result<WindowOutcome, DriverError> {
        // An earlier session may have run past this window's start.
        if matches!(mode, ScheduleMode::Solar) && window.start() <= self.ctx.clock.now() {
            warn!(window = %window, "too late to start; skipping");
            return Ok(WindowOutcome::Skipped {
                reason: "window opened before the previous session finished".to_owned(),
            });
        }

        let mut session = CaptureSession::new(&self.ctx, window.clone());
        let report = match session.run().await {
            Ok(report) => report,
            Err(err) => {
                error!(
                    window = %window,
                    error = %err,
                    outcome = ?session.outcome(),
                    "capture session failed; media stays in staging"
                );
                return Ok(WindowOutcome::Failed {
                    phase: err.phase(),
                    error: err.to_string(),
                });
            }
        };

        let upload = self.upload_staged_to(destination).await?;
        Ok(WindowOutcome::Captured {
            session: report,
            upload,
        })
    }

    /// Upload whatever is in the staging area to the folder for `date`/`label`.
    pub async fn upload_staged(
        &self,
        date: NaiveDate,
        label: &str,
    ) -> Result<UploadReport, DriverError> {
        let destination = RemoteDestination::new(&self.ctx.upload_root, date, label);
        self.upload_staged_to(&destination).await
    }

    async fn upload_staged_to(
        &self,
        destination: &RemoteDestination,
    ) -> Result<UploadReport, DriverError> {
        upload_staging(&self.ctx.uploader, &self.ctx.staging, destination).await
    }
}

/// Upload every regular file in `staging_dir` to `destination`.
///
/// Files that fail to upload stay where they are for a later pass.
pub async fn upload_staging(
    uploader: &UploadScheduler,
    staging_dir: &Path,
    destination: &RemoteDestination,
) -> Result<UploadReport, DriverError> {
    let files = staging::list_files(staging_dir)
        .await
        .map_err(|source| DriverError::Staging {
            path: staging_dir.to_path_buf(),
            source,
        })?;
    info!(files = files.len(), %destination, "uploading staged media");
    let report = uploader
        .upload(files, destination, |done, total| {
            info!(remaining = total - done, "files remaining");
        })
        .await;
    for task in report.failed() {
        warn!(file = %task.local_path.display(), "left in staging for a later upload pass");
    }
    Ok(report)
}

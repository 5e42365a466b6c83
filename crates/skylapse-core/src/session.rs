//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! One capture window from hand-off to hand-back.
//!
//! The device work (hand-off, configuration, capture, retrieval) runs as
//! one fallible block. Restoring the home network always runs afterwards,
//! whichever step failed, and only then is the original failure returned.

use std::path::PathBuf;

use serde::Serialize;
use skylapse_camera::CameraError;
use skylapse_net::NetError;
use skylapse_rt::{settle, wait_until};
use skylapse_schedule::CaptureWindow;
use tracing::{error, info, warn};

use crate::context::RunContext;
use crate::error::SessionError;
use crate::phase::{SessionOutcome, SessionPhase};
use crate::staging;

/// What a successful session left in the staging area.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub window: CaptureWindow,
    pub retrieved: Vec<PathBuf>,
    pub bytes: u64,
    pub history: Vec<SessionPhase>,
}

#[derive(Debug)]
pub struct CaptureSession<'a> {
    ctx: &'a RunContext,
    window: CaptureWindow,
    history: Vec<SessionPhase>,
    outcome: Option<SessionOutcome>,
    retrieved: Vec<PathBuf>,
    bytes: u64,
}

impl<'a> CaptureSession<'a> {
    pub fn new(ctx: &'a RunContext, window: CaptureWindow) -> Self {
        Self {
            ctx,
            window,
            history: vec![SessionPhase::Idle],
            outcome: None,
            retrieved: Vec::new(),
            bytes: 0,
        }
    }

    pub fn window(&self) -> &CaptureWindow {
        &self.window
    }

    pub fn phase(&self) -> SessionPhase {
        self.history
            .last()
            .copied()
            .unwrap_or(SessionPhase::Idle)
    }

    /// Every phase entered so far, in order.
    pub fn history(&self) -> &[SessionPhase] {
        &self.history
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Run the window to completion.
    ///
    /// Home connectivity is restored on every exit path before this returns.
    /// A device-side failure is returned unchanged even when the restore
    /// also fails.
    pub async fn run(&mut self) -> Result<SessionReport, SessionError> {
        info!(window = %self.window, "capture session created");
        self.enter(SessionPhase::AwaitingWindowStart);
        wait_until(
            self.ctx.clock.as_ref(),
            self.window.start(),
            self.ctx.timing.poll_interval,
            "window start",
        )
        .await;
        info!(label = %self.window.label(), "window open");

        let device = self.device_work().await;
        if let Err(err) = &device {
            error!(
                label = %self.window.label(),
                phase = %err.phase(),
                error = %err,
                "capture failed; restoring home network"
            );
        }

        let restore = self.restore_home().await;

        match (device, restore) {
            (Ok(()), Ok(())) => {
                self.enter(SessionPhase::Done);
                self.outcome = Some(SessionOutcome::Success);
                info!(
                    label = %self.window.label(),
                    files = self.retrieved.len(),
                    bytes = self.bytes,
                    "capture session complete"
                );
                Ok(SessionReport {
                    window: self.window.clone(),
                    retrieved: self.retrieved.clone(),
                    bytes: self.bytes,
                    history: self.history.clone(),
                })
            }
            (Ok(()), Err(source)) => {
                self.enter(SessionPhase::Failed);
                self.outcome = Some(SessionOutcome::FatalFailure);
                Err(SessionError::Cleanup { source })
            }
            (Err(err), Ok(())) => {
                self.enter(SessionPhase::Failed);
                self.outcome = Some(SessionOutcome::RecoveredFailure);
                Err(err)
            }
            (Err(err), Err(cleanup)) => {
                warn!(error = %cleanup, "home network restore also failed");
                self.enter(SessionPhase::Failed);
                self.outcome = Some(SessionOutcome::FatalFailure);
                Err(err)
            }
        }
    }

    fn enter(&mut self, phase: SessionPhase) {
        info!(label = %self.window.label(), %phase, "session phase");
        self.history.push(phase);
    }

    fn network(&self, source: NetError) -> SessionError {
        SessionError::Network {
            phase: self.phase(),
            source,
        }
    }

    fn camera(&self, source: CameraError) -> SessionError {
        SessionError::Camera {
            phase: self.phase(),
            source,
        }
    }

    async fn device_work(&mut self) -> Result<(), SessionError> {
        let ctx = self.ctx;
        let switcher = &ctx.switcher;
        let camera = ctx.camera.as_ref();
        let after_command = ctx.timing.after_command;

        self.enter(SessionPhase::HandingOffToDevice);
        let device = switcher.device().clone();
        switcher
            .verify_presence(&device.ssid)
            .await
            .map_err(|err| self.network(err))?;
        switcher.disconnect().await.map_err(|err| self.network(err))?;
        switcher
            .connect_to(&device)
            .await
            .map_err(|err| self.network(err))?;

        self.enter(SessionPhase::Configuring);
        camera.power_on().await.map_err(|err| self.camera(err))?;
        let status = camera.status().await.map_err(|err| self.camera(err))?;
        info!(busy = status.is_busy(), "camera status");
        settle(after_command, "power on").await;
        camera
            .set_mode(ctx.profile.mode, ctx.profile.submode)
            .await
            .map_err(|err| self.camera(err))?;
        settle(after_command, "mode").await;
        for setting in &ctx.profile.settings {
            camera
                .set_setting(setting.key, setting.value)
                .await
                .map_err(|err| self.camera(err))?;
            info!(key = setting.key, value = setting.value, "camera setting applied");
            settle(after_command, "setting").await;
        }

        self.enter(SessionPhase::Capturing);
        camera
            .start_capture()
            .await
            .map_err(|err| self.camera(err))?;
        settle(after_command, "shutter").await;
        switcher.disconnect().await.map_err(|err| self.network(err))?;

        self.enter(SessionPhase::AwaitingWindowEnd);
        wait_until(
            ctx.clock.as_ref(),
            self.window.end(),
            ctx.timing.poll_interval,
            "window end",
        )
        .await;

        self.enter(SessionPhase::RetrievingMedia);
        switcher
            .connect_to(&device)
            .await
            .map_err(|err| self.network(err))?;
        camera.stop_capture().await.map_err(|err| self.camera(err))?;
        settle(after_command, "shutter").await;

        let media = camera.list_media().await.map_err(|err| self.camera(err))?;
        let total: usize = media.iter().map(|directory| directory.file_count()).sum();
        info!(files = total, directories = media.len(), "media listed");
        staging::ensure(&ctx.staging)
            .await
            .map_err(|source| SessionError::Staging {
                phase: SessionPhase::RetrievingMedia,
                path: ctx.staging.clone(),
                source,
            })?;
        for directory in &media {
            for filename in directory.filenames() {
                let destination = ctx.staging.join(&filename);
                let bytes = camera
                    .retrieve_file(&directory.directory, &filename, &destination)
                    .await
                    .map_err(|err| self.camera(err))?;
                info!(
                    file = %destination.display(),
                    bytes,
                    "saved"
                );
                self.bytes += bytes;
                self.retrieved.push(destination);
            }
        }

        camera
            .delete_all_media()
            .await
            .map_err(|err| self.camera(err))?;
        info!("camera storage cleared");

        if ctx.profile.power_off_after_capture {
            if let Err(err) = camera.power_off().await {
                warn!(error = %err, "camera did not power off");
            }
        }
        Ok(())
    }

    async fn restore_home(&mut self) -> Result<(), NetError> {
        self.enter(SessionPhase::CleaningUp);
        let ctx = self.ctx;
        if let Err(err) = ctx.switcher.disconnect().await {
            warn!(error = %err, "disconnect from camera failed; reconnecting home anyway");
        }
        let home = ctx.switcher.home().clone();
        ctx.switcher.connect_to(&home).await?;
        self.enter(SessionPhase::HandedBackHome);
        Ok(())
    }
}

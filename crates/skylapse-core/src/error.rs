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

use skylapse_camera::CameraError;
use skylapse_net::NetError;
use skylapse_schedule::ScheduleError;
use thiserror::Error;

use crate::phase::SessionPhase;

/// Why a capture session failed. Returned only after home connectivity
/// has been restored (or its restoration attempted).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("network failure while {phase}: {source}")]
    Network {
        phase: SessionPhase,
        #[source]
        source: NetError,
    },
    #[error("camera failure while {phase}: {source}")]
    Camera {
        phase: SessionPhase,
        #[source]
        source: CameraError,
    },
    #[error("staging failure at {path} while {phase}: {source}")]
    Staging {
        phase: SessionPhase,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to restore the home network: {source}")]
    Cleanup {
        #[source]
        source: NetError,
    },
}

impl SessionError {
    /// Phase the failure happened in; `CleaningUp` for restore failures.
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionError::Network { phase, .. }
            | SessionError::Camera { phase, .. }
            | SessionError::Staging { phase, .. } => *phase,
            SessionError::Cleanup { .. } => SessionPhase::CleaningUp,
        }
    }

    /// True when the camera network was not broadcasting.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, SessionError::Network { source, .. } if source.is_unavailable())
    }
}

/// Failures that end a run before or between windows.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("configuration error: {0}")]
    Configuration(#[source] NetError),
    #[error("camera network is not available: {0}")]
    DeviceUnavailable(#[source] NetError),
    #[error("network failure during start-up: {0}")]
    Network(#[source] NetError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<NetError> for DriverError {
    fn from(err: NetError) -> Self {
        if err.is_configuration() {
            DriverError::Configuration(err)
        } else if err.is_unavailable() {
            DriverError::DeviceUnavailable(err)
        } else {
            DriverError::Network(err)
        }
    }
}

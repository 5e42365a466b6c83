//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt;

use serde::Serialize;

/// Lifecycle of one capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AwaitingWindowStart,
    HandingOffToDevice,
    Configuring,
    Capturing,
    AwaitingWindowEnd,
    RetrievingMedia,
    CleaningUp,
    HandedBackHome,
    Done,
    Failed,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::AwaitingWindowStart => "awaiting window start",
            SessionPhase::HandingOffToDevice => "handing off to device",
            SessionPhase::Configuring => "configuring",
            SessionPhase::Capturing => "capturing",
            SessionPhase::AwaitingWindowEnd => "awaiting window end",
            SessionPhase::RetrievingMedia => "retrieving media",
            SessionPhase::CleaningUp => "cleaning up",
            SessionPhase::HandedBackHome => "handed back home",
            SessionPhase::Done => "done",
            SessionPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Done | SessionPhase::Failed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Success,
    /// The session failed but home connectivity was restored.
    RecoveredFailure,
    /// Home connectivity could not be restored.
    FatalFailure,
}

//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Orchestration of a timelapse run.
//!
//! A [`RunContext`] is assembled once at start-up and handed to every
//! [`CaptureSession`]. The [`Orchestrator`] computes the day's windows, runs
//! one session per window strictly in sequence, and awaits each upload
//! phase before moving on.

mod context;
mod driver;
mod error;
mod phase;
mod session;
pub mod staging;

pub use context::{CameraProfile, RunContext, SessionTiming};
pub use driver::{
    resolve_switcher, upload_staging, Orchestrator, RunSummary, WindowOutcome, WindowSummary,
};
pub use error::{DriverError, SessionError};
pub use phase::{SessionOutcome, SessionPhase};
pub use session::{CaptureSession, SessionReport};

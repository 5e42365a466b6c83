//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Capture window calculation for the timelapse driver.
//!
//! The calculator is a pure function of its inputs: the evaluation instant and
//! the solar-time provider are always passed in, never read from ambient state.

mod calculator;
mod error;
mod solar;
mod window;

pub use calculator::{ScheduleCalculator, ScheduleMode, ScheduleSettings};
pub use error::ScheduleError;
pub use solar::{SolarModel, SolarTimeProvider, SolarTimes};
pub use window::CaptureWindow;

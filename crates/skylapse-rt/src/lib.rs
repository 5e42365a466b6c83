//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Runtime helpers supporting the capture driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Timing helpers for the skylapse runtime.

pub mod clock;
pub mod scheduling;

pub use clock::{AnchoredClock, Clock, SystemClock};
pub use scheduling::{settle, wait_until};

//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("window '{label}' is empty or inverted ({start} .. {end})")]
    InvalidWindow {
        label: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("window length {0:?} is not representable")]
    LengthOutOfRange(std::time::Duration),
}

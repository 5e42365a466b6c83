//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ScheduleError;

/// Interval during which the camera is expected to be recording.
///
/// `start < end` always holds; the only constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    label: String,
}

impl CaptureWindow {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let label = label.into();
        if start >= end {
            return Err(ScheduleError::InvalidWindow { label, start, end });
        }
        Ok(Self { start, end, label })
    }

    /// Window of `length` beginning at `start`.
    pub fn starting_at(
        start: DateTime<Utc>,
        length: Duration,
        label: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let end = chrono::Duration::from_std(length)
            .ok()
            .and_then(|span| start.checked_add_signed(span))
            .ok_or(ScheduleError::LengthOutOfRange(length))?;
        Self::new(start, end, label)
    }

    /// Window of `length` whose midpoint is `center`.
    pub fn centered_on(
        center: DateTime<Utc>,
        length: Duration,
        label: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let start = chrono::Duration::from_std(length / 2)
            .ok()
            .and_then(|half| center.checked_sub_signed(half))
            .ok_or(ScheduleError::LengthOutOfRange(length))?;
        Self::starting_at(start, length, label)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn length(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl fmt::Display for CaptureWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} .. {}]",
            self.label,
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}

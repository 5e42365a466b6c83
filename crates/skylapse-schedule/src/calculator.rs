//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use skylapse_common::config::{LocationConfig, ScheduleConfig};
use tracing::info;

use crate::error::ScheduleError;
use crate::solar::SolarTimeProvider;
use crate::window::CaptureWindow;

/// How the run's windows are chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScheduleMode {
    /// Sunrise and sunset windows for the reference date.
    #[default]
    Solar,
    /// One short window a few seconds from now.
    SingleTestWindow,
    /// One window starting immediately.
    CustomWindow { length: Duration, label: String },
}

/// Static inputs for the calculator.
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub timelapse_length: Duration,
    pub sunrise_label: String,
    pub sunset_label: String,
    pub test_offset: Duration,
    pub test_length: Duration,
    pub test_label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ScheduleSettings {
    pub fn from_config(schedule: &ScheduleConfig, location: &LocationConfig) -> Self {
        Self {
            timelapse_length: schedule.timelapse_length,
            sunrise_label: schedule.sunrise_label.clone(),
            sunset_label: schedule.sunset_label.clone(),
            test_offset: schedule.test_offset,
            test_length: schedule.test_length,
            test_label: schedule.test_label.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Derives capture windows from solar times or explicit overrides.
#[derive(Debug, Clone)]
pub struct ScheduleCalculator {
    settings: ScheduleSettings,
    solar: Arc<dyn SolarTimeProvider>,
}

impl ScheduleCalculator {
    pub fn new(settings: ScheduleSettings, solar: Arc<dyn SolarTimeProvider>) -> Self {
        Self { settings, solar }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Windows for `reference`, evaluated at `now`, ordered by start.
    ///
    /// In solar mode a window whose start is not strictly after `now` is
    /// dropped, never shortened.
    pub fn windows(
        &self,
        reference: NaiveDate,
        now: DateTime<Utc>,
        mode: &ScheduleMode,
    ) -> Result<Vec<CaptureWindow>, ScheduleError> {
        match mode {
            ScheduleMode::Solar => self.solar_windows(reference, now),
            ScheduleMode::SingleTestWindow => {
                let start = chrono::Duration::from_std(self.settings.test_offset)
                    .ok()
                    .and_then(|offset| now.checked_add_signed(offset))
                    .ok_or(ScheduleError::LengthOutOfRange(self.settings.test_offset))?;
                let window = CaptureWindow::starting_at(
                    start,
                    self.settings.test_length,
                    self.settings.test_label.clone(),
                )?;
                Ok(vec![window])
            }
            ScheduleMode::CustomWindow { length, label } => {
                Ok(vec![CaptureWindow::starting_at(now, *length, label.clone())?])
            }
        }
    }

    fn solar_windows(
        &self,
        reference: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<CaptureWindow>, ScheduleError> {
        let times =
            self.solar
                .times_for(reference, self.settings.latitude, self.settings.longitude);
        let events = [
            (times.sunrise, &self.settings.sunrise_label),
            (times.sunset, &self.settings.sunset_label),
        ];

        let mut windows = Vec::with_capacity(events.len());
        for (event, label) in events {
            let Some(event) = event else {
                info!(%label, %reference, "no solar event on this date; skipping");
                continue;
            };
            let window =
                CaptureWindow::centered_on(event, self.settings.timelapse_length, label.clone())?;
            if window.start() <= now {
                info!(%label, start = %window.start(), "too late to start timelapse; skipping");
                continue;
            }
            info!(%label, start = %window.start(), end = %window.end(), "timelapse scheduled");
            windows.push(window);
        }
        windows.sort_by_key(|window| window.start());
        Ok(windows)
    }
}

//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use chrono::{DateTime, NaiveDate, Utc};
use skylapse_schedule::{SolarTimeProvider, SolarTimes};

/// Returns the same sunrise and sunset whatever the date or place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSolar {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl FixedSolar {
    pub fn new(sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Self {
        Self {
            sunrise: Some(sunrise),
            sunset: Some(sunset),
        }
    }
}

impl SolarTimeProvider for FixedSolar {
    fn times_for(&self, _date: NaiveDate, _latitude: f64, _longitude: f64) -> SolarTimes {
        SolarTimes {
            sunrise: self.sunrise,
            sunset: self.sunset,
        }
    }
}

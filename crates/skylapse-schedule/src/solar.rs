//! ---
//! sl_section: "02-scheduling"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture window calculation."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::f64::consts::PI;
use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};

/// Sunrise and sunset for one date and location.
///
/// An event is `None` when it does not happen that day (polar day or night).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// Capability supplying solar event times to the calculator.
pub trait SolarTimeProvider: Debug + Send + Sync {
    fn times_for(&self, date: NaiveDate, latitude: f64, longitude: f64) -> SolarTimes;
}

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const J0: f64 = 0.0009;
const OBLIQUITY: f64 = RAD * 23.4397;
/// Apparent altitude of the sun's upper limb at rise/set, refraction included.
const RISE_SET_ALTITUDE: f64 = -0.833 * RAD;

/// Low-precision solar position model (about one minute of accuracy at
/// temperate latitudes).
#[derive(Debug, Default, Clone, Copy)]
pub struct SolarModel;

impl SolarTimeProvider for SolarModel {
    fn times_for(&self, date: NaiveDate, latitude: f64, longitude: f64) -> SolarTimes {
        let Some(noon_utc) = date.and_hms_opt(12, 0, 0) else {
            return SolarTimes {
                sunrise: None,
                sunset: None,
            };
        };
        let days = noon_utc.and_utc().timestamp_millis() as f64 / DAY_MS - 0.5 + J1970 - J2000;

        let lw = -longitude * RAD;
        let phi = latitude * RAD;
        let cycle = (days - J0 - lw / (2.0 * PI)).round();
        let approx_noon = approx_transit(0.0, lw, cycle);

        let mean_anomaly = RAD * (357.5291 + 0.985_600_28 * approx_noon);
        let ecliptic_longitude = ecliptic_longitude(mean_anomaly);
        let declination = (OBLIQUITY.sin() * ecliptic_longitude.sin()).asin();
        let transit = solar_transit(approx_noon, mean_anomaly, ecliptic_longitude);

        let cos_hour_angle = (RISE_SET_ALTITUDE.sin() - phi.sin() * declination.sin())
            / (phi.cos() * declination.cos());
        if !(-1.0..=1.0).contains(&cos_hour_angle) {
            return SolarTimes {
                sunrise: None,
                sunset: None,
            };
        }
        let hour_angle = cos_hour_angle.acos();
        let set = solar_transit(
            approx_transit(hour_angle, lw, cycle),
            mean_anomaly,
            ecliptic_longitude,
        );
        let rise = transit - (set - transit);

        SolarTimes {
            sunrise: from_julian(rise),
            sunset: from_julian(set),
        }
    }
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

fn solar_transit(approx: f64, mean_anomaly: f64, ecliptic_longitude: f64) -> f64 {
    J2000 + approx + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * ecliptic_longitude).sin()
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let center = RAD
        * (1.9148 * mean_anomaly.sin()
            + 0.02 * (2.0 * mean_anomaly).sin()
            + 0.0003 * (3.0 * mean_anomaly).sin());
    let perihelion = RAD * 102.9372;
    mean_anomaly + center + perihelion + PI
}

fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let millis = (julian + 0.5 - J1970) * DAY_MS;
    DateTime::from_timestamp_millis(millis.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn assert_near(actual: DateTime<Utc>, expected: DateTime<Utc>) {
        let delta = (actual - expected).num_seconds().abs();
        assert!(delta < 180, "expected {} got {}", expected, actual);
    }

    #[test]
    fn london_midsummer() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SolarModel.times_for(date, 51.5074, -0.1278);
        assert_near(
            times.sunrise.unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 21, 3, 44, 0).unwrap(),
        );
        assert_near(
            times.sunset.unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 21, 20, 22, 0).unwrap(),
        );
    }

    #[test]
    fn western_longitude_keeps_local_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let times = SolarModel.times_for(date, 37.7749, -122.4194);
        let sunrise = times.sunrise.unwrap();
        assert_eq!(sunrise.date_naive(), date);
        assert_eq!(sunrise.hour(), 14);
        assert!(times.sunset.unwrap() > sunrise);
    }

    #[test]
    fn polar_day_has_no_events() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SolarModel.times_for(date, 78.22, 15.65);
        assert_eq!(times.sunrise, None);
        assert_eq!(times.sunset, None);
    }
}

//! Simplified solar position and daily prayer-time calculations.
//!
//! The model is a low-precision one, meant as a lightweight on-device estimate.
//! Without the equation of time, events can be off by up to about a quarter of
//! an hour depending on the season. It does not replace a full ephemeris:
//!
//! - The obliquity of the ecliptic is fixed at 23.439° (no secular term).
//! - The equation of time is not applied; solar noon is `12 − longitude/15`.
//! - Refraction is the constant 0.833° used for the sunset altitude.
//!
//! All event times are produced in hours on the UTC clock of the calculation
//! date ("true solar frame" shifted by longitude only). Add the UTC offset of the
//! observer's zone to get local clock time; [`schedule::PrayerSchedule`] does
//! that and truncates to the `HH:MM` display granularity.
//!
//! ## Polar days and nights
//!
//! When the sun never reaches an event's altitude on a date, the hour-angle
//! cosine falls outside `[-1, 1]`. It is clamped and the event is reported in
//! [`SolarDayTimes::clamped`], so callers can show the value as approximate.
//!
//! ## Module Structure
//!
//! - [`schedule`]: local prayer schedule and next-prayer selection
//! - [`timezone`]: UTC offset resolution for a coordinate and date

pub mod schedule;
pub mod timezone;

pub use schedule::{PrayerSchedule, format_hhmm, hours_to_naive_time, wrap_hours};
pub use timezone::{TimezoneSetting, determine_timezone_from_coordinates, resolve_utc_offset_hours};


use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::*;
use crate::error::QiblaError;
use crate::geo::{GeoCoordinate, normalize_angle};

/// Daily events derived from the sun's position, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarEvent {
    Fajr,
    /// Apparent sunrise. Computed for reference, not one of the five prayers.
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl SolarEvent {
    /// The five prayers in their fixed daily order.
    pub const PRAYERS: [SolarEvent; 5] = [
        SolarEvent::Fajr,
        SolarEvent::Dhuhr,
        SolarEvent::Asr,
        SolarEvent::Maghrib,
        SolarEvent::Isha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SolarEvent::Fajr => "Fajr",
            SolarEvent::Sunrise => "Sunrise",
            SolarEvent::Dhuhr => "Dhuhr",
            SolarEvent::Asr => "Asr",
            SolarEvent::Maghrib => "Maghrib",
            SolarEvent::Isha => "Isha",
        }
    }
}

/// Intermediate quantities of the simplified solar model for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub julian_day: f64,
    /// Julian centuries since J2000.0.
    pub centuries: f64,
    /// Mean solar longitude, degrees in `[0, 360)`.
    pub mean_longitude: f64,
    /// Mean anomaly, degrees in `[0, 360)`.
    pub mean_anomaly: f64,
    pub equation_of_center: f64,
    /// Apparent solar longitude, degrees in `[0, 360)`.
    pub apparent_longitude: f64,
    /// Solar declination in degrees.
    pub declination: f64,
}

/// Julian day of local midnight at the start of `date`, expressed in UTC.
pub fn julian_day(date: NaiveDate, utc_offset_hours: f64) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let days = date.signed_duration_since(epoch).num_days() as f64;
    UNIX_EPOCH_JULIAN_DAY + days - utc_offset_hours / 24.0
}

/// Evaluate the truncated solar series at a Julian day.
pub fn solar_position(julian_day: f64) -> SolarPosition {
    let t = (julian_day - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_CENTURY;

    let mean_longitude = normalize_angle(280.46646 + t * (36000.76983 + t * 0.0003032));
    let mean_anomaly = normalize_angle(357.52911 + t * (35999.05029 - t * 0.0001536));
    let m = mean_anomaly.to_radians();

    let equation_of_center = (1.914602 - t * (0.004817 + t * 0.000014)) * m.sin()
        + (0.019993 - t * 0.000101) * (2.0 * m).sin()
        + 0.000029 * (3.0 * m).sin();

    let apparent_longitude = normalize_angle(mean_longitude + equation_of_center);
    let declination = (apparent_longitude.to_radians().sin() * OBLIQUITY_DEG.to_radians().sin())
        .asin()
        .to_degrees();

    SolarPosition {
        julian_day,
        centuries: t,
        mean_longitude,
        mean_anomaly,
        equation_of_center,
        apparent_longitude,
        declination,
    }
}

/// Hour angle, in hours, at which the sun crosses `altitude_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HourAngle {
    hours: f64,
    clamped: bool,
}

fn hour_angle(latitude_deg: f64, declination_deg: f64, altitude_deg: f64) -> HourAngle {
    let phi = latitude_deg.to_radians();
    let delta = declination_deg.to_radians();

    let cos_h = (altitude_deg.to_radians().sin() - phi.sin() * delta.sin())
        / (phi.cos() * delta.cos());

    // NaN only arises from a degenerate 0/0 at the exact pole; treat it as
    // "sun stays on one side of the altitude" like any other out-of-range value.
    let (bounded, clamped) = if cos_h.is_nan() {
        (1.0, true)
    } else if !(-1.0..=1.0).contains(&cos_h) {
        (cos_h.clamp(-1.0, 1.0), true)
    } else {
        (cos_h, false)
    };

    HourAngle {
        hours: bounded.acos().to_degrees() / 15.0,
        clamped,
    }
}

/// Solar altitude at which an object's shadow equals `shadow_factor` times its
/// length plus its noon shadow.
fn asr_altitude_deg(latitude_deg: f64, declination_deg: f64, shadow_factor: f64) -> f64 {
    let noon_zenith = (latitude_deg - declination_deg).abs().to_radians();
    (1.0 / (shadow_factor + noon_zenith.tan())).atan().to_degrees()
}

/// Event times of one calendar date at one coordinate.
///
/// Values are fractional hours on the UTC clock and may fall outside `[0, 24)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarDayTimes {
    pub date: NaiveDate,
    pub coordinate: GeoCoordinate,
    /// Offset the local day was anchored to.
    pub utc_offset_hours: f64,
    pub fajr: f64,
    pub sunrise: f64,
    pub dhuhr: f64,
    pub asr: f64,
    pub maghrib: f64,
    pub isha: f64,
    /// Solar declination used for the hour angles, in degrees.
    pub declination: f64,
    /// Events whose hour angle had to be clamped.
    pub clamped: Vec<SolarEvent>,
}

impl SolarDayTimes {
    pub fn time(&self, event: SolarEvent) -> f64 {
        match event {
            SolarEvent::Fajr => self.fajr,
            SolarEvent::Sunrise => self.sunrise,
            SolarEvent::Dhuhr => self.dhuhr,
            SolarEvent::Asr => self.asr,
            SolarEvent::Maghrib => self.maghrib,
            SolarEvent::Isha => self.isha,
        }
    }

    /// Event time on the local clock, wrapped into `[0, 24)`.
    pub fn local_hours(&self, event: SolarEvent, utc_offset_hours: f64) -> f64 {
        wrap_hours(self.time(event) + utc_offset_hours)
    }

    pub fn is_clamped(&self, event: SolarEvent) -> bool {
        self.clamped.contains(&event)
    }

    /// True when any event is a clamped boundary value rather than a real time.
    pub fn is_degraded(&self) -> bool {
        !self.clamped.is_empty()
    }

    /// Error out with [`QiblaError::NumericDomainClamp`] if any event was clamped.
    pub fn ensure_exact(&self) -> std::result::Result<(), QiblaError> {
        if self.clamped.is_empty() {
            Ok(())
        } else {
            Err(QiblaError::NumericDomainClamp {
                events: self.clamped.clone(),
            })
        }
    }

    /// Local prayer schedule for display.
    pub fn schedule(&self, utc_offset_hours: f64) -> PrayerSchedule {
        PrayerSchedule::from_day_times(self, utc_offset_hours)
    }
}

/// Compute the day's events for `coordinate` on `date`.
///
/// `utc_offset_hours` places the date's local midnight on the UTC time line for
/// the solar position; it does not shift the returned times.
pub fn solar_day_times(
    date: NaiveDate,
    coordinate: GeoCoordinate,
    utc_offset_hours: f64,
) -> Result<SolarDayTimes> {
    if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > MAXIMUM_UTC_OFFSET_HOURS {
        anyhow::bail!(
            "UTC offset must be between -{max} and +{max} hours (got {utc_offset_hours})",
            max = MAXIMUM_UTC_OFFSET_HOURS
        );
    }

    let position = solar_position(julian_day(date, utc_offset_hours));
    let lat = coordinate.latitude();
    let decl = position.declination;
    let noon = 12.0 - coordinate.longitude() / 15.0;

    let mut clamped = Vec::new();
    let mut crossing = |event: SolarEvent, altitude: f64| {
        let angle = hour_angle(lat, decl, altitude);
        if angle.clamped {
            clamped.push(event);
        }
        angle.hours
    };

    let fajr = noon - crossing(SolarEvent::Fajr, FAJR_ALTITUDE_DEG);
    let sunrise = noon - crossing(SolarEvent::Sunrise, SUNSET_ALTITUDE_DEG);
    let asr = noon
        + crossing(
            SolarEvent::Asr,
            asr_altitude_deg(lat, decl, ASR_SHADOW_FACTOR),
        );
    let maghrib = noon + crossing(SolarEvent::Maghrib, SUNSET_ALTITUDE_DEG);
    let isha = noon + crossing(SolarEvent::Isha, ISHA_ALTITUDE_DEG);

    if !clamped.is_empty() {
        let names: Vec<&str> = clamped.iter().map(|e| e.name()).collect();
        log_warning!(
            "{} does not occur at {coordinate} on {date}; using the clamped value",
            names.join(", ")
        );
    }

    Ok(SolarDayTimes {
        date,
        coordinate,
        utc_offset_hours,
        fajr,
        sunrise,
        dhuhr: noon,
        asr,
        maghrib,
        isha,
        declination: decl,
        clamped,
    })
}

//! Local prayer schedule and next-prayer selection.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use super::{SolarDayTimes, SolarEvent};

/// Wrap an hour value into `[0, 24)`.
pub fn wrap_hours(hours: f64) -> f64 {
    let wrapped = hours.rem_euclid(24.0);
    if wrapped >= 24.0 { 0.0 } else { wrapped }
}

/// Convert fractional hours to a wall-clock time truncated to the minute.
pub fn hours_to_naive_time(hours: f64) -> NaiveTime {
    let wrapped = wrap_hours(hours);
    let hour = wrapped.floor() as u32;
    let minute = ((wrapped - wrapped.floor()) * 60.0).floor() as u32;
    NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or_default()
}

/// Zero-padded `HH:MM` for fractional hours, wrapping into a single day.
pub fn format_hhmm(hours: f64) -> String {
    let time = hours_to_naive_time(hours);
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// The five prayers of one day on the local clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerSchedule {
    entries: [(SolarEvent, NaiveTime); 5],
}

impl PrayerSchedule {
    pub fn new(
        fajr: NaiveTime,
        dhuhr: NaiveTime,
        asr: NaiveTime,
        maghrib: NaiveTime,
        isha: NaiveTime,
    ) -> Self {
        Self {
            entries: [
                (SolarEvent::Fajr, fajr),
                (SolarEvent::Dhuhr, dhuhr),
                (SolarEvent::Asr, asr),
                (SolarEvent::Maghrib, maghrib),
                (SolarEvent::Isha, isha),
            ],
        }
    }

    /// Shift computed times onto the local clock and truncate to the minute.
    pub fn from_day_times(times: &SolarDayTimes, utc_offset_hours: f64) -> Self {
        let local = |event| hours_to_naive_time(times.time(event) + utc_offset_hours);
        Self::new(
            local(SolarEvent::Fajr),
            local(SolarEvent::Dhuhr),
            local(SolarEvent::Asr),
            local(SolarEvent::Maghrib),
            local(SolarEvent::Isha),
        )
    }

    pub fn time(&self, event: SolarEvent) -> Option<NaiveTime> {
        self.entries
            .iter()
            .find(|(e, _)| *e == event)
            .map(|(_, time)| *time)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SolarEvent, NaiveTime)> + '_ {
        self.entries.iter().copied()
    }

    /// First prayer, in daily order, whose time is strictly later than `now`.
    ///
    /// After the last prayer of the day this wraps to Fajr, i.e. tomorrow's.
    ///
    /// Times are compared as plain clock times. When a late event falls past
    /// local midnight (Isha on clamped high-latitude days, or a large offset) it
    /// sorts before the evening, so an evening query skips it and reports Fajr.
    pub fn next_after(&self, now: NaiveTime) -> SolarEvent {
        self.entries
            .iter()
            .find(|(_, time)| *time > now)
            .map(|(event, _)| *event)
            .unwrap_or(self.entries[0].0)
    }
}

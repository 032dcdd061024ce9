//! Implementation of the times command.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use crate::args::CliPosition;
use crate::geo::GeoCoordinate;
use crate::session::{
    Clock, FixedPosition, ManualClock, QiblaSession, SessionSettings, SystemClock, parse_datetime,
};
use crate::solar::{
    self, PrayerSchedule, SolarDayTimes, SolarEvent, TimezoneSetting, format_hhmm,
    resolve_utc_offset_hours,
};

/// A day of prayer times on the local clock.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub times: SolarDayTimes,
    pub utc_offset_hours: f64,
    pub schedule: PrayerSchedule,
    /// Only known when the reported day is today on the session clock.
    pub next_prayer: Option<SolarEvent>,
}

/// Compute the report for `date` (default: today on the session clock).
pub fn day_report(
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
    position: GeoCoordinate,
    timezone: TimezoneSetting,
    date: Option<NaiveDate>,
) -> Result<DayReport> {
    let today_guess = clock.local_now().date_naive();
    let mut session = QiblaSession::with_clock(settings, clock);
    session.locate(&mut FixedPosition(position))?;

    let offset_today = resolve_utc_offset_hours(timezone, position, today_guess);
    let today = session.local_date(offset_today);

    let (times, utc_offset_hours, next_prayer) = match date {
        Some(date) if date != today => {
            let offset = resolve_utc_offset_hours(timezone, position, date);
            (solar::solar_day_times(date, position, offset)?, offset, None)
        }
        _ => {
            let next = session.next_prayer(offset_today)?;
            let times = session
                .day_times(offset_today)?
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Session has no position"))?;
            (times, offset_today, next)
        }
    };

    Ok(DayReport {
        schedule: times.schedule(utc_offset_hours),
        times,
        utc_offset_hours,
        next_prayer,
    })
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Handle the times command
pub fn handle_times_command(
    position: CliPosition,
    date: Option<NaiveDate>,
    timezone: Option<String>,
    at: Option<String>,
) -> Result<()> {
    log_version!();

    let config = super::load_config()?;
    let settings = SessionSettings::from_config(&config)?;
    let position = super::resolve_position(position, &config)?;
    let timezone = match timezone {
        Some(zone) => zone.parse::<TimezoneSetting>()?,
        None => config.timezone()?,
    };
    let clock: Arc<dyn Clock> = match at {
        Some(at) => Arc::new(ManualClock::starting_at(parse_datetime(&at)?)),
        None => Arc::new(SystemClock),
    };

    if clock.is_simulated() {
        log_block_start!(
            "Clock set to {}",
            clock.local_now().format("%Y-%m-%d %H:%M:%S")
        );
    }

    let report = day_report(settings, clock, position, timezone, date)?;

    log_block_start!(
        "Prayer times for {} at {} (UTC{:+})",
        report.times.date,
        position,
        report.utc_offset_hours
    );
    for (event, time) in report.schedule.iter() {
        let marker = if report.next_prayer == Some(event) {
            "  ← next"
        } else {
            ""
        };
        let approx = if report.times.is_clamped(event) { " ~" } else { "" };
        log_indented!("{:<8} {}{}{}", event.name(), format_time(time), approx, marker);
    }
    log_indented!(
        "{:<8} {}",
        SolarEvent::Sunrise.name(),
        format_hhmm(report.times.time(SolarEvent::Sunrise) + report.utc_offset_hours)
    );

    if let Err(e) = report.times.ensure_exact() {
        log_pipe!();
        log_warning!("{e}");
    }
    log_end!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::KAABA;
    use chrono::{Local, TimeZone};

    fn clock_at(y: i32, m: u32, d: u32, h: u32) -> Arc<dyn Clock> {
        let start = Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        Arc::new(ManualClock::starting_at(start))
    }

    #[test]
    fn test_report_for_today_has_next_prayer() {
        let report = day_report(
            SessionSettings::default(),
            clock_at(2024, 3, 20, 12),
            KAABA,
            TimezoneSetting::Utc,
            None,
        )
        .unwrap();
        assert_eq!(report.utc_offset_hours, 0.0);
        assert!(report.next_prayer.is_some());
        assert_eq!(report.schedule, report.times.schedule(0.0));
    }

    #[test]
    fn test_report_for_other_day() {
        let date = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        let report = day_report(
            SessionSettings::default(),
            clock_at(2024, 3, 20, 12),
            KAABA,
            TimezoneSetting::Named(chrono_tz::Asia::Riyadh),
            Some(date),
        )
        .unwrap();
        assert_eq!(report.times.date, date);
        assert_eq!(report.utc_offset_hours, 3.0);
        assert_eq!(report.next_prayer, None);
        assert!(!report.times.is_degraded());
    }
}

//! UTC offset resolution for displaying solar times on the local clock.
//!
//! The solar model never decides which zone the user lives in. The offset comes
//! from a [`TimezoneSetting`]: an explicit IANA zone, the system zone, UTC, or a
//! lookup of the zone containing the coordinate.

use anyhow::Result;
use chrono::{Local, NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tzf_rs::DefaultFinder;

use crate::geo::GeoCoordinate;

// Building the finder decodes the embedded boundary data; do it once.
static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Where the UTC offset for displaying times comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimezoneSetting {
    /// Zone containing the coordinate.
    Auto,
    /// Zone of the machine running the calculation.
    System,
    Utc,
    Named(Tz),
}

impl FromStr for TimezoneSetting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "auto" => Ok(TimezoneSetting::Auto),
            "system" => Ok(TimezoneSetting::System),
            "UTC" | "utc" => Ok(TimezoneSetting::Utc),
            other => other
                .parse::<Tz>()
                .map(TimezoneSetting::Named)
                .map_err(|_| anyhow::anyhow!("Unknown timezone '{other}'")),
        }
    }
}

impl fmt::Display for TimezoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezoneSetting::Auto => f.write_str("auto"),
            TimezoneSetting::System => f.write_str("system"),
            TimezoneSetting::Utc => f.write_str("UTC"),
            TimezoneSetting::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// IANA zone containing the coordinate. Open ocean and unknown areas give UTC.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Offset from UTC, in hours, in effect on `date` for the given setting.
pub fn resolve_utc_offset_hours(
    setting: TimezoneSetting,
    coordinate: GeoCoordinate,
    date: NaiveDate,
) -> f64 {
    let seconds = match setting {
        TimezoneSetting::Utc => 0,
        TimezoneSetting::System => Local.offset_from_utc_date(&date).fix().local_minus_utc(),
        TimezoneSetting::Named(tz) => tz.offset_from_utc_date(&date).fix().local_minus_utc(),
        TimezoneSetting::Auto => {
            let tz = determine_timezone_from_coordinates(coordinate.latitude(), coordinate.longitude());
            tz.offset_from_utc_date(&date).fix().local_minus_utc()
        }
    };
    seconds as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("auto".parse::<TimezoneSetting>().unwrap(), TimezoneSetting::Auto);
        assert_eq!("system".parse::<TimezoneSetting>().unwrap(), TimezoneSetting::System);
        assert_eq!("UTC".parse::<TimezoneSetting>().unwrap(), TimezoneSetting::Utc);
        assert_eq!(
            "Asia/Riyadh".parse::<TimezoneSetting>().unwrap(),
            TimezoneSetting::Named(chrono_tz::Asia::Riyadh)
        );
        assert!("Mars/Olympus_Mons".parse::<TimezoneSetting>().is_err());
    }

    #[test]
    fn test_named_zone_respects_dst() {
        let nyc = GeoCoordinate::new(40.7128, -74.0060).unwrap();
        let setting = TimezoneSetting::Named(chrono_tz::America::New_York);
        assert_eq!(resolve_utc_offset_hours(setting, nyc, date(2024, 1, 15)), -5.0);
        assert_eq!(resolve_utc_offset_hours(setting, nyc, date(2024, 7, 15)), -4.0);
    }

    #[test]
    fn test_auto_zone_from_coordinates() {
        let mecca = GeoCoordinate::new(21.4225, 39.8262).unwrap();
        assert_eq!(
            determine_timezone_from_coordinates(mecca.latitude(), mecca.longitude()),
            chrono_tz::Asia::Riyadh
        );
        assert_eq!(
            resolve_utc_offset_hours(TimezoneSetting::Auto, mecca, date(2024, 3, 1)),
            3.0
        );
    }

    #[test]
    fn test_utc_setting() {
        let any = GeoCoordinate::new(10.0, 10.0).unwrap();
        assert_eq!(
            resolve_utc_offset_hours(TimezoneSetting::Utc, any, date(2024, 3, 1)),
            0.0
        );
    }
}

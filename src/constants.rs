//! Application-wide constants and defaults.
//!
//! Numeric constants of the geodesy, filtering and solar models live here together
//! with the configuration defaults and the validation limits applied to them.

// # Target

/// Latitude of the Kaaba in degrees.
pub const KAABA_LATITUDE: f64 = 21.4225;
/// Longitude of the Kaaba in degrees.
pub const KAABA_LONGITUDE: f64 = 39.8262;

// # Geodesy

/// Mean Earth radius used by the haversine distance, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// # Heading filter

/// Default exponential smoothing factor applied per sample.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.4;
/// Default jump (in degrees) above which a sample is treated as a glitch.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 90.0;

pub const MINIMUM_SMOOTHING_FACTOR: f64 = 0.0; // exclusive
pub const MAXIMUM_SMOOTHING_FACTOR: f64 = 1.0;
pub const MINIMUM_OUTLIER_THRESHOLD: f64 = 0.0; // exclusive
pub const MAXIMUM_OUTLIER_THRESHOLD: f64 = 180.0;

// # Alignment

/// Default tolerance, in degrees, for the device to count as pointing at the target.
pub const DEFAULT_ALIGNMENT_THRESHOLD: f64 = 5.0;

pub const MINIMUM_ALIGNMENT_THRESHOLD: f64 = 0.0; // exclusive
pub const MAXIMUM_ALIGNMENT_THRESHOLD: f64 = 90.0;

// # Position fix

/// Seconds to wait for a position fix before giving up.
pub const DEFAULT_FIX_TIMEOUT_SECS: u64 = 25;

pub const MINIMUM_FIX_TIMEOUT_SECS: u64 = 1;
pub const MAXIMUM_FIX_TIMEOUT_SECS: u64 = 300;

// # Solar model

/// Julian day of the J2000.0 epoch.
pub const J2000_JULIAN_DAY: f64 = 2_451_545.0;
/// Julian day of 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
/// Days per Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Fixed obliquity of the ecliptic in degrees (no secular correction).
pub const OBLIQUITY_DEG: f64 = 23.439;

/// Solar altitude defining Fajr (astronomical dawn).
pub const FAJR_ALTITUDE_DEG: f64 = -18.0;
/// Solar altitude defining Isha (astronomical dusk).
pub const ISHA_ALTITUDE_DEG: f64 = -18.0;
/// Apparent sunrise/sunset altitude: refraction plus solar semi-diameter.
pub const SUNSET_ALTITUDE_DEG: f64 = -0.833;
/// Shadow-length factor for Asr (1 = standard convention).
pub const ASR_SHADOW_FACTOR: f64 = 1.0;

/// Largest UTC offset in use anywhere, in hours.
pub const MAXIMUM_UTC_OFFSET_HOURS: f64 = 14.0;

// # Config defaults

pub const DEFAULT_TIMEZONE: &str = "auto";
pub const CONFIG_DIR_NAME: &str = "qibla";
pub const CONFIG_FILE_NAME: &str = "qibla.toml";

// # Exit codes

pub const EXIT_FAILURE: i32 = 1;

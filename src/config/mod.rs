//! Configuration system for qibla.
//!
//! Settings live in `qibla.toml` inside `$XDG_CONFIG_HOME/qibla/` (or the directory
//! given with `--config`). Every field is optional; accessors on [`Config`] return
//! the effective value, falling back to the defaults in [`crate::constants`].
//!
//! ```toml
//! #[Target]
//! target_latitude = 21.4225      # Latitude of the target (-90 to 90)
//! target_longitude = 39.8262     # Longitude of the target (-180 to 180)
//!
//! #[Heading]
//! alignment_threshold = 5.0      # Degrees within which the device counts as aligned (0-90]
//! smoothing_factor = 0.4         # Fraction of each heading change applied per sample (0-1]
//! outlier_threshold = 90.0       # Larger jumps between samples are discarded (0-180]
//!
//! #[Location]
//! fix_timeout_secs = 25          # Seconds to wait for a position fix (1-300)
//! timezone = "auto"              # "auto", "system", "UTC" or an IANA zone name
//! latitude = 40.7128             # Optional fixed position used by the CLI
//! longitude = -74.0060
//! ```
//!
//! Validation runs on every load and names the offending field and its range.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::constants::*;
use crate::geo::GeoCoordinate;
use crate::solar::TimezoneSetting;

pub use builder::{create_default_config, update_coordinates};
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Settings read from `qibla.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub target_latitude: Option<f64>,
    pub target_longitude: Option<f64>,
    pub alignment_threshold: Option<f64>, // degrees
    pub smoothing_factor: Option<f64>,
    pub outlier_threshold: Option<f64>, // degrees
    pub fix_timeout_secs: Option<u64>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,  // fixed user position
    pub longitude: Option<f64>, // fixed user position
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// The coordinate bearings are computed towards.
    pub fn target(&self) -> Result<GeoCoordinate> {
        GeoCoordinate::new(
            self.target_latitude.unwrap_or(KAABA_LATITUDE),
            self.target_longitude.unwrap_or(KAABA_LONGITUDE),
        )
    }

    pub fn alignment_threshold(&self) -> f64 {
        self.alignment_threshold
            .unwrap_or(DEFAULT_ALIGNMENT_THRESHOLD)
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor.unwrap_or(DEFAULT_SMOOTHING_FACTOR)
    }

    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold.unwrap_or(DEFAULT_OUTLIER_THRESHOLD)
    }

    pub fn fix_timeout(&self) -> Duration {
        Duration::from_secs(self.fix_timeout_secs.unwrap_or(DEFAULT_FIX_TIMEOUT_SECS))
    }

    pub fn timezone(&self) -> Result<TimezoneSetting> {
        self.timezone
            .as_deref()
            .unwrap_or(DEFAULT_TIMEZONE)
            .parse()
    }

    /// Fixed user position, if both coordinates are configured.
    pub fn position(&self) -> Result<Option<GeoCoordinate>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoCoordinate::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        let target = self.target_latitude.unwrap_or(KAABA_LATITUDE);
        let target_lon = self.target_longitude.unwrap_or(KAABA_LONGITUDE);
        log_indented!("Target: {target:.4}°, {target_lon:.4}°");

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            log_indented!(
                "Location: {:.3}°{}, {:.3}°{}",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir
            );
        }

        log_indented!("Alignment threshold: {}°", self.alignment_threshold());
        log_indented!(
            "Heading filter: α = {}, outliers > {}°",
            self.smoothing_factor(),
            self.outlier_threshold()
        );
        log_indented!("Fix timeout: {} seconds", self.fix_timeout().as_secs());
        log_indented!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        );
    }
}

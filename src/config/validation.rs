//! Configuration validation functionality.
//!
//! Rejects values that would make the geometry or the heading filter meaningless:
//! coordinates off the globe, a smoothing factor that never moves the heading,
//! thresholds outside the half circle.

use anyhow::Result;

use super::Config;
use crate::constants::*;
use crate::solar::TimezoneSetting;

/// Validate every configured field against its allowed range.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_coordinate_pair(
        config.target_latitude,
        config.target_longitude,
        "target_latitude",
        "target_longitude",
    )?;
    validate_coordinate_pair(config.latitude, config.longitude, "latitude", "longitude")?;

    // Coordinates are only usable as a pair.
    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be set together");
    }

    if let Some(threshold) = config.alignment_threshold {
        validate_half_open(
            threshold,
            MINIMUM_ALIGNMENT_THRESHOLD,
            MAXIMUM_ALIGNMENT_THRESHOLD,
            "alignment_threshold",
            "°",
        )?;
    }

    if let Some(alpha) = config.smoothing_factor {
        validate_half_open(
            alpha,
            MINIMUM_SMOOTHING_FACTOR,
            MAXIMUM_SMOOTHING_FACTOR,
            "smoothing_factor",
            "",
        )?;
    }

    if let Some(threshold) = config.outlier_threshold {
        validate_half_open(
            threshold,
            MINIMUM_OUTLIER_THRESHOLD,
            MAXIMUM_OUTLIER_THRESHOLD,
            "outlier_threshold",
            "°",
        )?;
    }

    if let Some(timeout) = config.fix_timeout_secs
        && !(MINIMUM_FIX_TIMEOUT_SECS..=MAXIMUM_FIX_TIMEOUT_SECS).contains(&timeout)
    {
        anyhow::bail!(
            "fix_timeout_secs ({}) must be between {} and {} seconds",
            timeout,
            MINIMUM_FIX_TIMEOUT_SECS,
            MAXIMUM_FIX_TIMEOUT_SECS
        );
    }

    if let Some(ref zone) = config.timezone {
        zone.parse::<TimezoneSetting>()
            .map_err(|e| anyhow::anyhow!("timezone: {e} (use \"auto\", \"system\", \"UTC\" or an IANA name)"))?;
    }

    Ok(())
}

fn validate_coordinate_pair(
    latitude: Option<f64>,
    longitude: Option<f64>,
    lat_name: &str,
    lon_name: &str,
) -> Result<()> {
    if let Some(lat) = latitude
        && !(lat.is_finite() && (-90.0..=90.0).contains(&lat))
    {
        anyhow::bail!("{lat_name} must be between -90 and 90 degrees (got {lat})");
    }

    if let Some(lon) = longitude
        && !(lon.is_finite() && (-180.0..=180.0).contains(&lon))
    {
        anyhow::bail!("{lon_name} must be between -180 and 180 degrees (got {lon})");
    }

    Ok(())
}

/// Check `minimum < value <= maximum`.
fn validate_half_open(value: f64, minimum: f64, maximum: f64, name: &str, unit: &str) -> Result<()> {
    if !value.is_finite() || value <= minimum || value > maximum {
        anyhow::bail!(
            "{name} ({value}{unit}) must be greater than {minimum}{unit} and at most {maximum}{unit}"
        );
    }
    Ok(())
}

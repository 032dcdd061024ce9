//! Great-circle geometry and angle helpers.
//!
//! Every other module routes its angle arithmetic through the helpers defined here
//! so that wraparound is handled the same way everywhere:
//!
//! - [`normalize_angle`] folds any angle into `[0, 360)`
//! - [`angular_difference`] is the unsigned short-way difference in `[0, 180]`
//! - [`signed_difference`] keeps the direction of rotation in `[-180, 180]`
//!
//! ## Module Structure
//!
//! - [`compass`]: 16-point compass rose naming
//! - [`declination`]: approximate magnetic declination and its accuracy buckets

pub mod compass;
pub mod declination;

pub use compass::CompassPoint;
pub use declination::{DeclinationAccuracy, DeclinationModel, LongitudeHeuristic};

#[cfg(test)]
mod tests;

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::constants::{EARTH_RADIUS_KM, KAABA_LATITUDE, KAABA_LONGITUDE};

/// A point on the Earth's surface in degrees.
///
/// Construction through [`GeoCoordinate::new`] guarantees a finite latitude in
/// `[-90, 90]` and longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// The fixed target every bearing is computed towards.
pub const KAABA: GeoCoordinate = GeoCoordinate {
    latitude: KAABA_LATITUDE,
    longitude: KAABA_LONGITUDE,
};

impl GeoCoordinate {
    /// Create a coordinate, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("latitude must be between -90 and 90 degrees (got {latitude})");
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("longitude must be between -180 and 180 degrees (got {longitude})");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}°, {:.4}°)", self.latitude, self.longitude)
    }
}

/// Fold any finite angle into `[0, 360)`.
pub fn normalize_angle(deg: f64) -> f64 {
    let folded = deg.rem_euclid(360.0);
    // -1e-18 folds to 360.0 after rounding
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Unsigned short-way difference between two angles, in `[0, 180]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

/// Signed short-way rotation from `from` to `to`, in `[-180, 180]`.
///
/// Positive values are clockwise.
pub fn signed_difference(from: f64, to: f64) -> f64 {
    let mut diff = (to - from) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Initial great-circle bearing between two points given in raw degrees.
///
/// Uses `atan2(sin Δλ, cos φ1 · tan φ2 − sin φ1 · cos Δλ)`. Coincident points
/// yield 0, which carries no direction.
pub fn initial_bearing_deg(lat_from: f64, lon_from: f64, lat_to: f64, lon_to: f64) -> f64 {
    let phi_from = lat_from.to_radians();
    let phi_to = lat_to.to_radians();
    let delta_lambda = (lon_to - lon_from).to_radians();

    let y = delta_lambda.sin();
    let x = phi_from.cos() * phi_to.tan() - phi_from.sin() * delta_lambda.cos();

    // Snap the rounding residue of coincident points (or 360° apart) to north.
    if y.abs() < 1e-12 && x.abs() < 1e-12 {
        return 0.0;
    }

    normalize_angle(y.atan2(x).to_degrees())
}

/// Bearing from `from` to `to`, clockwise from true north in `[0, 360)`.
pub fn bearing(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    initial_bearing_deg(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Great-circle distance in kilometres using the haversine formula.
pub fn distance_km(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let phi_from = from.latitude.to_radians();
    let phi_to = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi_from.cos() * phi_to.cos() * (delta_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Bearing from `position` to the Kaaba.
pub fn qibla_bearing(position: GeoCoordinate) -> f64 {
    bearing(position, KAABA)
}

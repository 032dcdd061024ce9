//! Approximate magnetic declination.
//!
//! Compass sensors that are not true-north referenced report magnetic headings.
//! The [`LongitudeHeuristic`] model is a crude longitude/latitude rule of thumb,
//! not a World Magnetic Model lookup; its output is only good for telling the user
//! how far off a magnetic compass is likely to be. A real coefficient table can be
//! plugged in by implementing [`DeclinationModel`].

use serde::Serialize;

use super::{GeoCoordinate, normalize_angle};

/// Source of magnetic declination values (degrees, positive east of true north).
pub trait DeclinationModel {
    fn declination(&self, position: GeoCoordinate) -> f64;
}

/// Longitude-proportional approximation. Labelled as an estimate wherever shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongitudeHeuristic;

impl DeclinationModel for LongitudeHeuristic {
    fn declination(&self, position: GeoCoordinate) -> f64 {
        let lon = position.longitude();
        let lat = position.latitude();

        // Western hemisphere tends west of north.
        let base = if lon < 0.0 {
            -5.0 - lon.abs() * 0.1
        } else {
            lon.abs() * 0.1
        };

        if lat > 45.0 {
            base * 1.2
        } else if lat < -45.0 {
            base * 0.8
        } else {
            base
        }
    }
}

/// How much a magnetic compass is expected to disagree with true north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclinationAccuracy {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DeclinationAccuracy {
    pub fn from_declination(declination: f64) -> Self {
        match declination.abs() {
            d if d < 2.0 => DeclinationAccuracy::Excellent,
            d if d < 5.0 => DeclinationAccuracy::Good,
            d if d < 10.0 => DeclinationAccuracy::Fair,
            _ => DeclinationAccuracy::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeclinationAccuracy::Excellent => "Excellent",
            DeclinationAccuracy::Good => "Good",
            DeclinationAccuracy::Fair => "Fair",
            DeclinationAccuracy::Poor => "Poor",
        }
    }
}

/// Convert a magnetic heading to a true-north heading.
pub fn true_heading_from_magnetic(magnetic_heading: f64, declination: f64) -> f64 {
    normalize_angle(magnetic_heading + declination)
}

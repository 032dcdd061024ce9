//! Names for bearings on a 16-point compass rose (N, NNE, NE, ...).
use serde::Serialize;
use std::fmt;

use super::normalize_angle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

const ROSE: [CompassPoint; 16] = [
    CompassPoint::N,
    CompassPoint::NNE,
    CompassPoint::NE,
    CompassPoint::ENE,
    CompassPoint::E,
    CompassPoint::ESE,
    CompassPoint::SE,
    CompassPoint::SSE,
    CompassPoint::S,
    CompassPoint::SSW,
    CompassPoint::SW,
    CompassPoint::WSW,
    CompassPoint::W,
    CompassPoint::WNW,
    CompassPoint::NW,
    CompassPoint::NNW,
];

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl CompassPoint {
    /// Nearest rose point to a bearing; each point covers 22.5° centred on itself.
    pub fn from_degrees(bearing: f64) -> Self {
        let index = (normalize_angle(bearing) / 22.5).round() as usize % ROSE.len();
        ROSE[index]
    }

    /// Centre bearing of this point in degrees.
    pub fn degrees(&self) -> f64 {
        let index = ROSE.iter().position(|p| p == self).unwrap_or(0);
        index as f64 * 22.5
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompassPoint::N => "north",
            CompassPoint::NNE => "north-northeast",
            CompassPoint::NE => "northeast",
            CompassPoint::ENE => "east-northeast",
            CompassPoint::E => "east",
            CompassPoint::ESE => "east-southeast",
            CompassPoint::SE => "southeast",
            CompassPoint::SSE => "south-southeast",
            CompassPoint::S => "south",
            CompassPoint::SSW => "south-southwest",
            CompassPoint::SW => "southwest",
            CompassPoint::WSW => "west-southwest",
            CompassPoint::W => "west",
            CompassPoint::WNW => "west-northwest",
            CompassPoint::NW => "northwest",
            CompassPoint::NNW => "north-northwest",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

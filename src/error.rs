//! Error taxonomy shared by the session, the position-provider seam and the solar model.
//!
//! Contract violations (out-of-range coordinates, impossible UTC offsets) are not
//! part of this taxonomy: they fail fast with an `anyhow` error at the constructor
//! that received the bad input.

use std::fmt;

use crate::solar::SolarEvent;

/// Failure reported by an external position-fix provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixFailure {
    /// The platform has no geolocation capability.
    Unsupported,
    /// The user refused the location permission.
    Denied,
    /// A fix could not be obtained (no signal, provider error).
    Unavailable,
    /// No result arrived before the deadline.
    Timeout,
    /// Anything the provider could not classify.
    Unknown,
}

impl fmt::Display for FixFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FixFailure::Unsupported => "geolocation is not supported",
            FixFailure::Denied => "location permission denied",
            FixFailure::Unavailable => "location unavailable",
            FixFailure::Timeout => "location request timed out",
            FixFailure::Unknown => "unable to retrieve location",
        };
        f.write_str(text)
    }
}

/// Errors surfaced to presentation code.
#[derive(Debug, Clone, PartialEq)]
pub enum QiblaError {
    PositionUnavailable,
    PositionDenied,
    PositionTimeout,
    PositionUnknownFailure,
    OrientationUnsupported,
    /// Informational: one or more solar events do not occur on this day at this
    /// latitude and were replaced by the clamped boundary value.
    NumericDomainClamp { events: Vec<SolarEvent> },
}

impl fmt::Display for QiblaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QiblaError::PositionUnavailable => write!(f, "position unavailable"),
            QiblaError::PositionDenied => write!(f, "position permission denied"),
            QiblaError::PositionTimeout => write!(f, "position request timed out"),
            QiblaError::PositionUnknownFailure => write!(f, "position request failed"),
            QiblaError::OrientationUnsupported => write!(f, "orientation sensor not supported"),
            QiblaError::NumericDomainClamp { events } => {
                let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
                write!(
                    f,
                    "approximate times (event does not occur at this latitude): {}",
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for QiblaError {}

impl From<FixFailure> for QiblaError {
    fn from(failure: FixFailure) -> Self {
        match failure {
            // No capability and no fix both leave the device without a position.
            FixFailure::Unsupported | FixFailure::Unavailable => QiblaError::PositionUnavailable,
            FixFailure::Denied => QiblaError::PositionDenied,
            FixFailure::Timeout => QiblaError::PositionTimeout,
            FixFailure::Unknown => QiblaError::PositionUnknownFailure,
        }
    }
}

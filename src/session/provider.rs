//! Seam to the platform's position-fix capability.
//!
//! Permission prompts and platform APIs live behind this trait; the session only
//! sees a position or a [`FixFailure`].

use std::time::Duration;

use crate::error::FixFailure;
use crate::geo::GeoCoordinate;

/// One-shot position source.
#[cfg_attr(test, mockall::automock)]
pub trait PositionProvider {
    /// Request a single fix, giving up after `timeout`.
    fn request_position(&mut self, timeout: Duration) -> Result<GeoCoordinate, FixFailure>;
}

/// Provider answering with a configured position, e.g. from `qibla.toml`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub GeoCoordinate);

impl PositionProvider for FixedPosition {
    fn request_position(&mut self, _timeout: Duration) -> Result<GeoCoordinate, FixFailure> {
        Ok(self.0)
    }
}

/// Provider for platforms without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl PositionProvider for NoGeolocation {
    fn request_position(&mut self, _timeout: Duration) -> Result<GeoCoordinate, FixFailure> {
        Err(FixFailure::Unsupported)
    }
}

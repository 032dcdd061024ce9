//! The qibla-finding session: one position fix, then a live heading stream.
//!
//! [`QiblaSession`] is a synchronous reducer over externally delivered events.
//! The presentation layer (or the CLI) tells it when a fix is requested, hands it
//! the provider's answer, and forwards orientation samples. In return it produces
//! [`SessionFrame`]s that pair the fixed bearing with the live, smoothed heading.
//!
//! ## Fix lifecycle
//!
//! ```text
//! NoFixRequested ──request_fix──▶ Locating ──success──▶ Located
//!                                    │
//!                                    └──failure / timeout──▶ LocationFailed
//! (any state) ──request_fix──▶ Locating
//! ```
//!
//! Every request is tagged with a [`FixTicket`]. Only the ticket of the current
//! `Locating` cycle can complete it, so a late answer to a superseded request is
//! dropped, and the deadline of an old cycle can never fire after a newer one
//! succeeded. Failures are terminal for their cycle; retrying means requesting a
//! new fix.
//!
//! ## Module Structure
//!
//! - [`clock`]: monotonic and wall-clock time behind a trait
//! - [`provider`]: the position-fix seam

pub mod clock;
pub mod provider;

pub use clock::{Clock, ManualClock, SystemClock, parse_datetime};
pub use provider::{FixedPosition, NoGeolocation, PositionProvider};

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::alignment::{self, AlignmentResult};
use crate::config::Config;
use crate::constants::{DEFAULT_ALIGNMENT_THRESHOLD, DEFAULT_FIX_TIMEOUT_SECS};
use crate::error::{FixFailure, QiblaError};
use crate::geo::{self, CompassPoint, GeoCoordinate, KAABA};
use crate::heading::{FilterSettings, HeadingFilter, HeadingSample};
use crate::solar::{self, SolarDayTimes, SolarEvent};

/// Observable lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoFixRequested,
    Locating,
    Located,
    LocationFailed,
}

/// What is known about the location permission, as far as fix outcomes tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// No fix outcome yet; the platform may still prompt.
    Prompt,
    Granted,
    Denied,
    /// The platform has no location capability at all.
    Unavailable,
}

/// Identifies one fix request. Later requests get larger generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixTicket(u64);

impl FixTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Result of a successful fix. Immutable until the next request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fix {
    pub position: GeoCoordinate,
    /// Initial great-circle bearing to the target, degrees in `[0, 360)`.
    pub bearing: f64,
    pub distance_km: f64,
}

/// Per-update output consumed by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionFrame {
    pub bearing: f64,
    pub distance_km: f64,
    /// Smoothed heading, absent until the first usable sample.
    pub heading: Option<f64>,
    pub alignment: AlignmentResult,
    /// Rotation of a device-relative arrow towards the target.
    pub pointer_rotation: Option<f64>,
    pub compass_point: CompassPoint,
}

/// Tunables of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub target: GeoCoordinate,
    pub alignment_threshold: f64,
    pub fix_timeout: Duration,
    pub filter: FilterSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            target: KAABA,
            alignment_threshold: DEFAULT_ALIGNMENT_THRESHOLD,
            fix_timeout: Duration::from_secs(DEFAULT_FIX_TIMEOUT_SECS),
            filter: FilterSettings::default(),
        }
    }
}

impl SessionSettings {
    /// Effective settings of a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            target: config.target()?,
            alignment_threshold: config.alignment_threshold(),
            fix_timeout: config.fix_timeout(),
            filter: FilterSettings {
                smoothing_factor: config.smoothing_factor(),
                outlier_threshold: config.outlier_threshold(),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    NoFixRequested,
    Locating { ticket: FixTicket, deadline: Instant },
    Located(Fix),
    LocationFailed(FixFailure),
}

/// Owns the fix state and the heading filter of one logical session.
pub struct QiblaSession {
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
    filter: HeadingFilter,
    phase: Phase,
    last_generation: u64,
    permission: PermissionState,
    orientation_supported: bool,
    day_times: Option<SolarDayTimes>,
}

impl QiblaSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: SessionSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            filter: HeadingFilter::new(settings.filter),
            phase: Phase::NoFixRequested,
            last_generation: 0,
            permission: PermissionState::Prompt,
            orientation_supported: true,
            day_times: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::NoFixRequested => SessionState::NoFixRequested,
            Phase::Locating { .. } => SessionState::Locating,
            Phase::Located(_) => SessionState::Located,
            Phase::LocationFailed(_) => SessionState::LocationFailed,
        }
    }

    /// Start a new fix cycle, superseding any pending one.
    ///
    /// The heading filter is reset: the sensor subscription of the previous cycle
    /// is considered stale.
    pub fn request_fix(&mut self) -> FixTicket {
        self.last_generation += 1;
        let ticket = FixTicket(self.last_generation);

        if let Phase::Locating { ticket: pending, .. } = self.phase {
            log_debug!(
                "Fix request #{} supersedes pending request #{}",
                ticket.0,
                pending.0
            );
        }

        self.filter.reset();
        self.phase = Phase::Locating {
            ticket,
            deadline: self.clock.now() + self.settings.fix_timeout,
        };
        log_debug!(
            "Fix request #{} issued, timeout {}s",
            ticket.0,
            self.settings.fix_timeout.as_secs()
        );
        ticket
    }

    /// Deliver the provider's answer for `ticket`.
    ///
    /// Returns `true` when the answer was applied. Answers for a superseded
    /// ticket, or arriving after the deadline, are ignored.
    pub fn complete_fix(
        &mut self,
        ticket: FixTicket,
        result: std::result::Result<GeoCoordinate, FixFailure>,
    ) -> bool {
        // The deadline wins over an answer that arrives after it.
        self.poll_timeout();

        match self.phase {
            Phase::Locating { ticket: current, .. } if current == ticket => {}
            _ => {
                log_debug!("Ignoring stale fix result for request #{}", ticket.0);
                return false;
            }
        }

        match result {
            Ok(position) => {
                let fix = Fix {
                    position,
                    bearing: geo::bearing(position, self.settings.target),
                    distance_km: geo::distance_km(position, self.settings.target),
                };
                log_debug!(
                    "Fix #{} at {position}: bearing {:.1}°, {:.0} km",
                    ticket.0,
                    fix.bearing,
                    fix.distance_km
                );
                self.phase = Phase::Located(fix);
                self.permission = PermissionState::Granted;
            }
            Err(failure) => {
                log_debug!("Fix #{} failed: {failure}", ticket.0);
                self.fail(failure);
            }
        }
        true
    }

    /// Fail the pending cycle if its deadline has passed. Returns `true` if it did.
    pub fn poll_timeout(&mut self) -> bool {
        if let Phase::Locating { ticket, deadline } = self.phase {
            if self.clock.now() >= deadline {
                log_debug!("Fix request #{} timed out", ticket.0);
                self.fail(FixFailure::Timeout);
                return true;
            }
        }
        false
    }

    fn fail(&mut self, failure: FixFailure) {
        self.phase = Phase::LocationFailed(failure);
        match failure {
            FixFailure::Denied => self.permission = PermissionState::Denied,
            FixFailure::Unsupported => self.permission = PermissionState::Unavailable,
            _ => {}
        }
    }

    /// Run one complete fix cycle against a blocking provider.
    pub fn locate<P>(&mut self, provider: &mut P) -> std::result::Result<Fix, QiblaError>
    where
        P: PositionProvider + ?Sized,
    {
        let ticket = self.request_fix();
        let result = provider.request_position(self.settings.fix_timeout);
        self.complete_fix(ticket, result);

        match self.phase {
            Phase::Located(fix) => Ok(fix),
            Phase::LocationFailed(failure) => Err(failure.into()),
            _ => Err(QiblaError::PositionUnknownFailure),
        }
    }

    /// Feed one orientation sample.
    ///
    /// Produces a frame only while located and only for samples the filter could
    /// interpret. With the orientation sensor marked unsupported, samples are
    /// ignored and the frame carries no heading.
    pub fn on_heading_sample(&mut self, sample: HeadingSample) -> Option<SessionFrame> {
        if !matches!(self.phase, Phase::Located(_)) {
            return None;
        }
        if self.orientation_supported {
            self.filter.update(sample)?;
        }
        self.current_frame()
    }

    /// Frame for the current state, `None` unless located.
    pub fn current_frame(&self) -> Option<SessionFrame> {
        let Phase::Located(fix) = self.phase else {
            return None;
        };

        let heading = self.heading();
        let alignment = heading
            .map(|h| alignment::evaluate(fix.bearing, h, self.settings.alignment_threshold))
            .unwrap_or_else(AlignmentResult::unavailable);

        Some(SessionFrame {
            bearing: fix.bearing,
            distance_km: fix.distance_km,
            heading,
            alignment,
            pointer_rotation: heading.map(|h| alignment::pointer_rotation(fix.bearing, h)),
            compass_point: CompassPoint::from_degrees(fix.bearing),
        })
    }

    /// Smoothed heading, `None` before the first sample or without a sensor.
    pub fn heading(&self) -> Option<f64> {
        if self.orientation_supported {
            self.filter.heading()
        } else {
            None
        }
    }

    pub fn fix(&self) -> Option<Fix> {
        match self.phase {
            Phase::Located(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<FixFailure> {
        match self.phase {
            Phase::LocationFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Position error of the current cycle.
    pub fn error(&self) -> Option<QiblaError> {
        self.failure().map(QiblaError::from)
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permission
    }

    /// Record that the device has no usable orientation sensor.
    pub fn mark_orientation_unsupported(&mut self) {
        log_debug!("Orientation sensor unsupported, heading disabled");
        self.orientation_supported = false;
        self.filter.reset();
    }

    pub fn orientation_error(&self) -> Option<QiblaError> {
        (!self.orientation_supported).then_some(QiblaError::OrientationUnsupported)
    }

    /// Restart heading smoothing, e.g. after resubscribing to the sensor.
    pub fn reset_heading(&mut self) {
        self.filter.reset();
    }

    /// Number of heading samples accepted and discarded since the last reset.
    pub fn heading_counts(&self) -> (u64, u64) {
        self.filter.counts()
    }

    /// End the session. A pending fix request can no longer complete.
    pub fn stop(&mut self) {
        if self.state() != SessionState::NoFixRequested {
            log_debug!("Session stopped");
        }
        self.filter.reset();
        self.phase = Phase::NoFixRequested;
        self.day_times = None;
    }

    /// Local date and time on the session clock for a given UTC offset.
    pub fn local_datetime(&self, utc_offset_hours: f64) -> NaiveDateTime {
        let offset = ChronoDuration::seconds((utc_offset_hours * 3600.0).round() as i64);
        self.clock.local_now().naive_utc() + offset
    }

    pub fn local_date(&self, utc_offset_hours: f64) -> NaiveDate {
        self.local_datetime(utc_offset_hours).date()
    }

    /// Today's solar times at the fixed position.
    ///
    /// The result is cached per date, position and UTC offset, and recomputed after
    /// the local date rolls over, the offset changes or a new fix lands somewhere
    /// else. `None` unless located.
    pub fn day_times(&mut self, utc_offset_hours: f64) -> Result<Option<&SolarDayTimes>> {
        let Some(fix) = self.fix() else {
            return Ok(None);
        };
        let date = self.local_date(utc_offset_hours);

        let stale = self
            .day_times
            .as_ref()
            .is_none_or(|t| {
                t.date != date
                    || t.coordinate != fix.position
                    || t.utc_offset_hours != utc_offset_hours
            });
        if stale {
            log_debug!(
                "Computing solar times for {date} at {} (UTC{utc_offset_hours:+})",
                fix.position
            );
            self.day_times = Some(solar::solar_day_times(date, fix.position, utc_offset_hours)?);
        }
        Ok(self.day_times.as_ref())
    }

    /// Next prayer after the current local time, wrapping to Fajr after Isha.
    pub fn next_prayer(&mut self, utc_offset_hours: f64) -> Result<Option<SolarEvent>> {
        let now = self.local_datetime(utc_offset_hours).time();
        Ok(self
            .day_times(utc_offset_hours)?
            .map(|times| times.schedule(utc_offset_hours).next_after(now)))
    }
}

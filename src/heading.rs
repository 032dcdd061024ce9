//! Heading smoothing and glitch rejection for orientation sensor streams.
//!
//! Orientation sensors report discontinuously: every full turn wraps 360° → 0°,
//! and magnetic interference produces momentary spikes. [`HeadingFilter`] turns
//! that stream into a heading that is stable enough to show to a person:
//!
//! 1. Each sample is converted to a compass bearing according to its
//!    [`SourceKind`], resolved once at the sensor boundary.
//! 2. Absolute compass readings are already stabilised by the platform and
//!    replace the heading as-is.
//! 3. For relative readings, the first valid sample after a reset is adopted
//!    as-is.
//! 4. Later relative samples whose short-way jump exceeds the outlier threshold
//!    are discarded without touching the state.
//! 5. Everything else moves the heading a fixed fraction of the short-way
//!    difference (exponential smoothing, applied per sample).
//!
//! The filter never fails. Samples without an angle are ignored.

use serde::Serialize;
use std::time::Duration;

use crate::constants::{DEFAULT_OUTLIER_THRESHOLD, DEFAULT_SMOOTHING_FACTOR};
use crate::geo::{normalize_angle, signed_difference};

/// How a sensor expresses its angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Already a clockwise-from-north compass heading.
    Absolute,
    /// Counter-clockwise rotation about the device's vertical axis.
    Relative,
}

/// One raw reading from an orientation sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    /// Degrees, or `None` when the sensor reported no value.
    pub angle: Option<f64>,
    pub source: SourceKind,
    /// Time since the sensor subscription started.
    pub timestamp: Duration,
}

impl HeadingSample {
    pub fn absolute(angle: f64) -> Self {
        Self {
            angle: Some(angle),
            source: SourceKind::Absolute,
            timestamp: Duration::ZERO,
        }
    }

    pub fn relative(angle: f64) -> Self {
        Self {
            angle: Some(angle),
            source: SourceKind::Relative,
            timestamp: Duration::ZERO,
        }
    }

    pub fn missing(source: SourceKind) -> Self {
        Self {
            angle: None,
            source,
            timestamp: Duration::ZERO,
        }
    }

    pub fn at(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The sample as a compass bearing in `[0, 360)`, if it carries a usable angle.
    pub fn compass_bearing(&self) -> Option<f64> {
        let angle = self.angle.filter(|a| a.is_finite())?;
        Some(match self.source {
            SourceKind::Absolute => normalize_angle(angle),
            // Device rotation runs opposite to compass bearings.
            SourceKind::Relative => normalize_angle(360.0 - angle),
        })
    }
}

/// Smoothed heading owned by one [`HeadingFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilteredHeading {
    /// Degrees in `[0, 360)`. Meaningless until `initialized`.
    pub angle: f64,
    pub initialized: bool,
}

/// What happened to the last sample fed to the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Absolute compass reading, taken without smoothing or rejection.
    PassedThrough,
    /// First relative sample after a reset, adopted directly.
    Seeded,
    /// Blended into the heading.
    Smoothed,
    /// Jump larger than the outlier threshold; state unchanged.
    Rejected { jump: f64 },
    /// No usable angle; state unchanged.
    Ignored,
}

/// Tuning of the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Fraction of the short-way difference applied per sample, in `(0, 1]`.
    pub smoothing_factor: f64,
    /// Largest accepted jump between consecutive samples, in degrees.
    pub outlier_threshold: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
        }
    }
}

/// Stateful smoother over a stream of [`HeadingSample`]s.
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    settings: FilterSettings,
    last_heading: Option<f64>,
    accepted: u64,
    rejected: u64,
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new(FilterSettings::default())
    }
}

impl HeadingFilter {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            settings,
            last_heading: None,
            accepted: 0,
            rejected: 0,
        }
    }

    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    /// Current state of the filter.
    pub fn state(&self) -> FilteredHeading {
        FilteredHeading {
            angle: self.last_heading.unwrap_or(0.0),
            initialized: self.last_heading.is_some(),
        }
    }

    /// Current heading, `None` before the first valid sample.
    pub fn heading(&self) -> Option<f64> {
        self.last_heading
    }

    /// Forget the heading; the next valid sample seeds the filter again.
    pub fn reset(&mut self) {
        self.last_heading = None;
        self.accepted = 0;
        self.rejected = 0;
    }

    /// Number of samples accepted and rejected since the last reset.
    pub fn counts(&self) -> (u64, u64) {
        (self.accepted, self.rejected)
    }

    /// Feed one sample. Returns the new state, or `None` for a sample without angle.
    pub fn update(&mut self, sample: HeadingSample) -> Option<FilteredHeading> {
        match self.apply(sample) {
            SampleOutcome::Ignored => None,
            _ => Some(self.state()),
        }
    }

    /// Feed one sample and report what the filter did with it.
    pub fn apply(&mut self, sample: HeadingSample) -> SampleOutcome {
        let Some(heading) = sample.compass_bearing() else {
            return SampleOutcome::Ignored;
        };

        if sample.source == SourceKind::Absolute {
            self.last_heading = Some(heading);
            self.accepted += 1;
            return SampleOutcome::PassedThrough;
        }

        let Some(last) = self.last_heading else {
            self.last_heading = Some(heading);
            self.accepted += 1;
            return SampleOutcome::Seeded;
        };

        let diff = signed_difference(last, heading);
        if diff.abs() > self.settings.outlier_threshold {
            self.rejected += 1;
            log_debug!("Discarded heading jump of {diff:.1}° (sensor glitch)");
            return SampleOutcome::Rejected { jump: diff };
        }

        self.last_heading = Some(normalize_angle(last + diff * self.settings.smoothing_factor));
        self.accepted += 1;
        SampleOutcome::Smoothed
    }
}

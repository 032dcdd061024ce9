//! Deciding whether the device points at the target.
//!
//! Callers must resolve a missing heading themselves (it means "not aligned");
//! these functions only take concrete angles.

use serde::Serialize;

use crate::constants::DEFAULT_ALIGNMENT_THRESHOLD;
use crate::geo::{angular_difference, normalize_angle};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentResult {
    pub is_aligned: bool,
    /// Short-way difference between bearing and heading, in `[0, 180]`.
    pub absolute_difference: f64,
}

impl AlignmentResult {
    /// Result used when no heading is available.
    pub fn unavailable() -> Self {
        Self {
            is_aligned: false,
            absolute_difference: 180.0,
        }
    }
}

/// Compare a target bearing with the current heading.
pub fn evaluate(target_bearing: f64, current_heading: f64, threshold_deg: f64) -> AlignmentResult {
    let absolute_difference = angular_difference(target_bearing, current_heading);
    AlignmentResult {
        is_aligned: absolute_difference <= threshold_deg,
        absolute_difference,
    }
}

/// True when the heading is within `threshold_deg` of the target bearing.
pub fn is_aligned(target_bearing: f64, current_heading: f64, threshold_deg: f64) -> bool {
    evaluate(target_bearing, current_heading, threshold_deg).is_aligned
}

/// [`is_aligned`] with the default 5° tolerance.
pub fn is_aligned_default(target_bearing: f64, current_heading: f64) -> bool {
    is_aligned(target_bearing, current_heading, DEFAULT_ALIGNMENT_THRESHOLD)
}

/// Angle, clockwise from the top of the device, at which an arrow must be drawn
/// to point at the target.
pub fn pointer_rotation(target_bearing: f64, current_heading: f64) -> f64 {
    normalize_angle(target_bearing - current_heading)
}

/// Rotation of a north-up compass dial so that it stays fixed to the world.
pub fn dial_rotation(current_heading: f64) -> f64 {
    normalize_angle(-current_heading)
}

//! Implementation of the bearing command.
//!
//! Runs a single fix cycle against the resolved position and reports the bearing,
//! the great-circle distance and what a magnetic compass would read.

use anyhow::Result;
use serde::Serialize;

use crate::args::CliPosition;
use crate::geo::{
    CompassPoint, DeclinationAccuracy, DeclinationModel, GeoCoordinate, LongitudeHeuristic,
    normalize_angle,
};
use crate::session::{FixedPosition, QiblaSession, SessionSettings};

/// Everything the bearing command reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BearingReport {
    pub position: GeoCoordinate,
    pub bearing: f64,
    pub distance_km: f64,
    pub compass_point: CompassPoint,
    /// Estimated declination at the position, positive east.
    pub declination: f64,
    pub declination_accuracy: DeclinationAccuracy,
    /// Bearing as read on an uncorrected magnetic compass.
    pub magnetic_bearing: f64,
}

/// Locate `position` in a fresh session and build the report.
pub fn bearing_report(
    settings: SessionSettings,
    position: GeoCoordinate,
    model: &impl DeclinationModel,
) -> Result<BearingReport> {
    let mut session = QiblaSession::new(settings);
    let fix = session.locate(&mut FixedPosition(position))?;
    let declination = model.declination(position);

    Ok(BearingReport {
        position,
        bearing: fix.bearing,
        distance_km: fix.distance_km,
        compass_point: CompassPoint::from_degrees(fix.bearing),
        declination,
        declination_accuracy: DeclinationAccuracy::from_declination(declination),
        magnetic_bearing: normalize_angle(fix.bearing - declination),
    })
}

/// Handle the bearing command
pub fn handle_bearing_command(position: CliPosition) -> Result<()> {
    log_version!();

    let config = super::load_config()?;
    let settings = SessionSettings::from_config(&config)?;
    let position = super::resolve_position(position, &config)?;

    let report = bearing_report(settings, position, &LongitudeHeuristic)?;

    log_block_start!("Bearing from {}", report.position);
    log_indented!(
        "Bearing: {:.1}° ({})",
        report.bearing,
        report.compass_point.name()
    );
    log_indented!("Distance: {:.0} km", report.distance_km);
    log_block_start!("Magnetic compass (estimate)");
    log_indented!(
        "Declination: {:+.1}° ({})",
        report.declination,
        report.declination_accuracy.label()
    );
    log_indented!("Compass reading: {:.1}°", report.magnetic_bearing);
    log_end!();

    println!("{:.1}", report.bearing);
    Ok(())
}

//! Implementation of the set-location command.

use anyhow::Result;

use crate::config;
use crate::geo::{self, GeoCoordinate};

/// Handle the set-location command: validate, save, and show the new bearing.
pub fn handle_set_location_command(latitude: f64, longitude: f64) -> Result<()> {
    log_version!();

    let position = GeoCoordinate::new(latitude, longitude)?;
    config::update_coordinates(position)?;

    // Reload to make sure the file still validates with the new values.
    let config = super::load_config()?;
    let target = config.target()?;
    log_indented!(
        "Bearing from here: {:.1}° ({:.0} km)",
        geo::bearing(position, target),
        geo::distance_km(position, target)
    );
    log_end!();
    Ok(())
}

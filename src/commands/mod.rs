//! Command-line command handlers for qibla.
//!
//! Each command is implemented in its own submodule. All of them resolve the
//! user's position the same way: coordinates from the command line win, then the
//! fixed position stored in `qibla.toml`.

pub mod bearing;
pub mod location;
pub mod replay;
pub mod times;

use anyhow::Result;

use crate::args::CliPosition;
use crate::config::Config;
use crate::geo::GeoCoordinate;
use crate::logger::Log;

/// Load the active config, listing the effective values in debug mode.
pub fn load_config() -> Result<Config> {
    let config = Config::load()?;
    if Log::is_debug() {
        config.log_config();
    }
    Ok(config)
}

/// Position from the command line, falling back to the configured one.
pub fn resolve_position(cli: CliPosition, config: &Config) -> Result<GeoCoordinate> {
    match cli {
        Some((latitude, longitude)) => GeoCoordinate::new(latitude, longitude),
        None => config.position()?.ok_or_else(|| {
            anyhow::anyhow!(
                "No position given. Pass <lat> <lon> or save one with 'qibla set-location <lat> <lon>'"
            )
        }),
    }
}

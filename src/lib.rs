//! # Qibla Library
//!
//! Internal library for the `qibla` binary application, usable on its own by any
//! front end that can deliver position fixes and orientation samples.
//!
//! ## Architecture
//!
//! The library is organized into several layers, leaves first:
//!
//! - **Geometry**: `geo` for bearings, great-circle distances and angle helpers
//! - **Solar**: `solar` for the simplified solar model and daily prayer times
//! - **Heading**: `heading` for smoothing and glitch rejection of sensor streams
//! - **Alignment**: `alignment` for the "pointing at the target" decision
//! - **Session**: `session` wires the above into a fix-then-stream state machine
//! - **Configuration**: `config` for TOML-based settings
//! - **Commands**: `commands` and `args` for the CLI front end
//! - **Infrastructure**: logging, constants and the shared error taxonomy

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod alignment;
pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod heading;
pub mod session;
pub mod solar;

pub use error::{FixFailure, QiblaError};
pub use geo::GeoCoordinate;
pub use session::{QiblaSession, SessionFrame, SessionSettings, SessionState};

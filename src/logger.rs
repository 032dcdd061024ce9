//! Structured logging with visual box-drawing output.
//!
//! All diagnostics of the library and the `qibla` binary flow through the macros
//! defined here. Output goes to stderr so that machine-readable data written to
//! stdout (for example the JSON frames of `qibla replay`) stays clean.
//!
//! ## Conventions
//!
//! - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
//! - **`log_decorated!`** continues a block (`┣ message`).
//! - **`log_indented!`** prints nested details (`┃   message`).
//! - **`log_pipe!`** inserts an empty `┃` line, typically before a levelled message.
//! - **`log_version!`** prints the header once at startup, **`log_end!`** the final `╹`.
//! - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`** carry a colored
//!   `[LEVEL]` tag. `log_debug!` is silent unless debug output was enabled with
//!   [`Log::set_debug`].
//!
//! Logging can be switched off entirely with [`Log::set_enabled`], which the test
//! suites and embedding applications use to keep output quiet.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Runtime switches for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if debug output is enabled (and logging in general is on).
    pub fn is_debug() -> bool {
        Self::is_enabled() && DEBUG_ENABLED.load(Ordering::SeqCst)
    }
}

// Public so the exported macros can reach it through `$crate`.
#[doc(hidden)]
pub fn write_output(text: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($template:literal, $($arg:tt)+) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)+);
            $crate::logger::write_output(&format!($template, message));
        }
    }};
}

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣ {}\n", $($arg)+)
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃   {}\n", $($arg)+)
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("┃\n");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃\n┣ {}\n", $($arg)+)
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::logger::write_output(&format!("┏ qibla v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("╹\n");
        }
    }};
}

/// Log a warning message with yellow level tag.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an error message with red level tag.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an error that terminates the current flow (`┗` corner).
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an informational message with green level tag.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log a debug message. Only printed when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug() {
            $crate::__log_line!("┣[\x1b[36mDEBUG\x1b[0m] {}\n", $($arg)+)
        }
    }};
}

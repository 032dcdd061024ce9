//! Clock abstraction for the session.
//!
//! The session needs a monotonic clock for the position-fix deadline and the wall
//! clock for the current date and time of day. [`SystemClock`] reads the real
//! clocks; [`ManualClock`] only moves when told to, which makes timeouts and
//! date rollovers deterministic in tests and in `qibla replay`.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic time, used for deadlines.
    fn now(&self) -> Instant;

    /// Wall-clock time in the system zone.
    fn local_now(&self) -> DateTime<Local>;

    /// Whether this clock is driven manually rather than by the system.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Real system clocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that advances only through [`ManualClock::advance`].
pub struct ManualClock {
    start_instant: Instant,
    start_time: DateTime<Local>,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Start a manual clock at the given wall-clock time.
    pub fn starting_at(start_time: DateTime<Local>) -> Self {
        Self {
            start_instant: Instant::now(),
            start_time,
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Start a manual clock at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    /// Move both clocks forward.
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += by;
    }

    fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start_instant + self.elapsed()
    }

    fn local_now(&self) -> DateTime<Local> {
        let elapsed = self.elapsed();
        let step = ChronoDuration::from_std(elapsed).unwrap_or(ChronoDuration::zero());
        self.start_time + step
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Parse "YYYY-MM-DD HH:MM:SS" (or without seconds) as a local wall-clock time.
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M"))
        .map_err(|e| anyhow::anyhow!("Invalid datetime '{s}': {e}. Use YYYY-MM-DD HH:MM[:SS]"))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Ambiguous or invalid local time '{s}'"))
}

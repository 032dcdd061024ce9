//! Implementation of the replay command.
//!
//! Feeds a recorded orientation stream through a located [`QiblaSession`] and
//! writes one JSON [`SessionFrame`](crate::session::SessionFrame) per produced
//! frame. Input has one directive per line:
//!
//! ```text
//! abs 58.2          # absolute compass heading, used as-is
//! rel 301.5 @1250   # relative rotation, smoothed; optional timestamp in ms
//! none              # sensor reported no angle
//! unsupported       # the device has no orientation sensor
//! ```
//!
//! Blank lines and `#` comments are skipped.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Duration;

use crate::args::CliPosition;
use crate::heading::{HeadingSample, SourceKind};
use crate::session::{FixedPosition, QiblaSession, SessionSettings};

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayDirective {
    Sample(HeadingSample),
    OrientationUnsupported,
}

/// Totals of one replay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub lines: usize,
    pub frames: usize,
    pub accepted: u64,
    pub rejected: u64,
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ReplayDirective>> {
    let content = line.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut parts = content.split_whitespace();
    let kind = parts.next().unwrap_or_default();
    let mut angle = None;
    let mut timestamp = Duration::ZERO;

    for part in parts {
        if let Some(ms) = part.strip_prefix('@') {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("Invalid timestamp '{part}'"))?;
            timestamp = Duration::from_millis(ms);
        } else if angle.is_none() {
            let value: f64 = part
                .parse()
                .with_context(|| format!("Invalid angle '{part}'"))?;
            angle = Some(value);
        } else {
            anyhow::bail!("Unexpected '{part}'");
        }
    }

    let source = match kind {
        "abs" => SourceKind::Absolute,
        "rel" => SourceKind::Relative,
        "none" => {
            return Ok(Some(ReplayDirective::Sample(
                HeadingSample::missing(SourceKind::Absolute).at(timestamp),
            )));
        }
        "unsupported" => return Ok(Some(ReplayDirective::OrientationUnsupported)),
        other => anyhow::bail!("Unknown directive '{other}' (expected abs, rel, none, unsupported)"),
    };

    Ok(Some(ReplayDirective::Sample(HeadingSample {
        angle,
        source,
        timestamp,
    })))
}

/// Run every line of `reader` through `session`, writing frames to `writer`.
///
/// The session must already be located; samples arriving otherwise produce
/// nothing.
pub fn replay<R: BufRead, W: Write>(
    session: &mut QiblaSession,
    reader: R,
    mut writer: W,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read replay input")?;
        summary.lines += 1;

        let directive =
            parse_line(&line).with_context(|| format!("Line {}: '{}'", index + 1, line.trim()))?;

        let frame = match directive {
            None => continue,
            Some(ReplayDirective::Sample(sample)) => session.on_heading_sample(sample),
            Some(ReplayDirective::OrientationUnsupported) => {
                session.mark_orientation_unsupported();
                session.current_frame()
            }
        };

        if let Some(frame) = frame {
            serde_json::to_writer(&mut writer, &frame).context("Failed to encode frame")?;
            writeln!(writer)?;
            summary.frames += 1;
        }
    }

    (summary.accepted, summary.rejected) = session.heading_counts();
    writer.flush()?;
    Ok(summary)
}

/// Handle the replay command
pub fn handle_replay_command(position: CliPosition, input: String) -> Result<()> {
    log_version!();

    let config = super::load_config()?;
    let settings = SessionSettings::from_config(&config)?;
    let position = super::resolve_position(position, &config)?;

    let mut session = QiblaSession::new(settings);
    let fix = session.locate(&mut FixedPosition(position))?;
    log_block_start!("Replaying heading samples from {}", position);
    log_indented!("Bearing: {:.1}°", fix.bearing);

    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&input).with_context(|| format!("Failed to open {input}"))?;
        Box::new(BufReader::new(file))
    };

    let summary = replay(&mut session, reader, io::stdout().lock())?;

    log_block_start!("Replay finished");
    log_indented!("Lines: {}", summary.lines);
    log_indented!("Frames: {}", summary.frames);
    log_indented!(
        "Samples accepted: {}, discarded as glitches: {}",
        summary.accepted,
        summary.rejected
    );
    log_end!();
    Ok(())
}

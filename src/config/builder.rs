//! Configuration file building and default config creation.
//!
//! Handles creating the default `qibla.toml`, updating an existing file with a
//! fixed position, and the builder that keeps setting comments aligned.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::get_config_path;
use crate::constants::*;
use crate::geo::GeoCoordinate;

/// Create a default config file at `path`, creating parent directories as needed.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let config_content = ConfigBuilder::new()
        .add_section("Target")
        .add_setting(
            "target_latitude",
            &KAABA_LATITUDE.to_string(),
            "Latitude of the target (-90 to 90)",
        )
        .add_setting(
            "target_longitude",
            &KAABA_LONGITUDE.to_string(),
            "Longitude of the target (-180 to 180)",
        )
        .add_section("Heading")
        .add_setting(
            "alignment_threshold",
            &format!("{DEFAULT_ALIGNMENT_THRESHOLD:.1}"),
            &format!(
                "Degrees within which the device counts as aligned ({MINIMUM_ALIGNMENT_THRESHOLD}-{MAXIMUM_ALIGNMENT_THRESHOLD}]"
            ),
        )
        .add_setting(
            "smoothing_factor",
            &DEFAULT_SMOOTHING_FACTOR.to_string(),
            &format!(
                "Fraction of each heading change applied per sample ({MINIMUM_SMOOTHING_FACTOR}-{MAXIMUM_SMOOTHING_FACTOR}]"
            ),
        )
        .add_setting(
            "outlier_threshold",
            &format!("{DEFAULT_OUTLIER_THRESHOLD:.1}"),
            &format!(
                "Larger jumps between samples are discarded ({MINIMUM_OUTLIER_THRESHOLD}-{MAXIMUM_OUTLIER_THRESHOLD}]"
            ),
        )
        .add_section("Location")
        .add_setting(
            "fix_timeout_secs",
            &DEFAULT_FIX_TIMEOUT_SECS.to_string(),
            &format!(
                "Seconds to wait for a position fix ({MINIMUM_FIX_TIMEOUT_SECS}-{MAXIMUM_FIX_TIMEOUT_SECS})"
            ),
        )
        .add_setting(
            "timezone",
            &format!("\"{DEFAULT_TIMEZONE}\""),
            "\"auto\", \"system\", \"UTC\" or an IANA zone name",
        )
        .build();

    fs::write(path, format!("{config_content}\n"))
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;

    log_block_start!("Created default config at {}", path.display());
    Ok(())
}

/// Store a fixed position in the active config file.
pub fn update_coordinates(position: GeoCoordinate) -> Result<()> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        create_default_config(&config_path)?;
    }
    update_coords_in_file(&config_path, position)
}

/// Store a fixed position in the config file at `config_path`.
///
/// Existing `latitude`/`longitude` lines are rewritten in place with their
/// comments kept in the same column; missing lines are appended.
pub fn update_coords_in_file(config_path: &Path, position: GeoCoordinate) -> Result<()> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    let values = [
        ("latitude", format!("{:.6}", position.latitude())),
        ("longitude", format!("{:.6}", position.longitude())),
    ];
    let mut found = [false; 2];

    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            for (index, (key, formatted)) in values.iter().enumerate() {
                if assigns_key(line, key) {
                    found[index] = true;
                    let target_column = line.find('#').unwrap_or(25);
                    return align_comment_to_column(line, key, formatted, target_column);
                }
            }
            line.to_string()
        })
        .collect();

    for ((key, formatted), present) in values.iter().zip(found) {
        if !present {
            lines.push(format!("{key} = {formatted}"));
        }
    }

    let mut updated_content = lines.join("\n");
    updated_content.push('\n');

    fs::write(config_path, updated_content).with_context(|| {
        format!(
            "Failed to write updated config to {}",
            config_path.display()
        )
    })?;

    log_block_start!("Updated location in {}", config_path.display());
    log_indented!("Latitude: {:.6}", position.latitude());
    log_indented!("Longitude: {:.6}", position.longitude());

    Ok(())
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

#[derive(Clone)]
struct ConfigEntry {
    content: String,
    entry_type: EntryType,
}

#[derive(Clone)]
enum EntryType {
    Section,
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry {
            content: format!("#[{title}]"),
            entry_type: EntryType::Section,
        });
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        let line = format!("{key} = {value}");
        self.entries.push(ConfigEntry {
            content: line.clone(),
            entry_type: EntryType::Setting {
                line,
                comment: format!("# {comment}"),
            },
        });
        self
    }

    fn build(self) -> String {
        // Align all comments one column past the longest setting line
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match &entry.entry_type {
                EntryType::Setting { line, .. } => Some(line.len()),
                EntryType::Section => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry.entry_type {
                EntryType::Section => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(entry.content);
                    first_section = false;
                }
                EntryType::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.join("\n")
    }
}

/// Find a config line assigning the specified key
pub(crate) fn find_config_line(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .find(|line| assigns_key(line, key))
        .map(str::to_string)
}

/// Whether `line` is an uncommented `key = value` assignment of exactly `key`.
fn assigns_key(line: &str, key: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.starts_with('#')
        && trimmed
            .split_once('=')
            .is_some_and(|(name, _)| name.trim() == key)
}

/// Replace the value of a config line, moving its comment to `target_column`.
fn align_comment_to_column(
    original_line: &str,
    key: &str,
    new_value: &str,
    target_column: usize,
) -> String {
    let key_value_part = format!("{key} = {new_value}");

    if let Some(comment_pos) = original_line.find('#') {
        let comment_part = &original_line[comment_pos..];

        let padding_needed = if key_value_part.len() < target_column {
            target_column - key_value_part.len()
        } else {
            1
        };

        format!(
            "{}{}{}",
            key_value_part,
            " ".repeat(padding_needed),
            comment_part
        )
    } else {
        key_value_part
    }
}

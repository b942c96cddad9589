// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for aprs-decode.
//!
//! Config is loaded from the `[aprs-decode]` section of `aprs-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./aprs-rs.toml`
//! 3. `~/.config/aprs-rs/aprs-rs.toml`
//! 4. `/etc/aprs-rs/aprs-rs.toml`

use aprs_app::ConfigFile;
use aprs_core::clock::DEFAULT_DRIFT_TOLERANCE_SECS;
use aprs_core::ReferenceTime;
use chrono::{Duration, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Widest real-world UTC offset, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Top-level decoder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Decoder behaviour
    pub decode: DecodeSettings,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per packet
    #[default]
    Json,
    /// Re-encoded `SENDER>PATH:PAYLOAD` lines
    Tnc2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    /// Zone for local (`DDHHMM/`) timestamps, minutes east of UTC.
    /// Defaults to the host zone.
    pub utc_offset_minutes: Option<i32>,
    /// How far in the future an HMS or MDHM timestamp may lie before it is
    /// taken to refer to the previous day or year.
    pub clock_drift_tolerance_secs: u32,
    /// Output format
    pub output: OutputFormat,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: None,
            clock_drift_tolerance_secs: DEFAULT_DRIFT_TOLERANCE_SECS as u32,
            output: OutputFormat::Json,
        }
    }
}

impl DecodeSettings {
    /// Reference time for one decode: the system clock, adjusted by config.
    pub fn reference_time(&self) -> ReferenceTime {
        let mut reference = ReferenceTime::system()
            .with_drift_tolerance(Duration::seconds(i64::from(self.clock_drift_tolerance_secs)));
        if let Some(offset) = self
            .utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
        {
            reference = reference.with_local_offset(offset);
        }
        reference
    }
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if let Some(minutes) = self.decode.utc_offset_minutes {
            if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
                return Err(format!(
                    "[decode].utc_offset_minutes must be in range {}..={}",
                    -MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES
                ));
            }
        }
        if self.decode.clock_drift_tolerance_secs > 86_400 {
            return Err("[decode].clock_drift_tolerance_secs must be at most 86400".to_string());
        }
        Ok(())
    }

    pub fn example_toml() -> String {
        #[derive(Serialize)]
        struct ExampleFile {
            #[serde(rename = "aprs-decode")]
            section: DecodeConfig,
        }

        let example = ExampleFile {
            section: DecodeConfig {
                general: GeneralConfig {
                    log_level: Some("info".to_string()),
                },
                decode: DecodeSettings {
                    utc_offset_minutes: Some(60),
                    ..DecodeSettings::default()
                },
            },
        };

        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

impl ConfigFile for DecodeConfig {
    fn section_key() -> &'static str {
        "aprs-decode"
    }
}

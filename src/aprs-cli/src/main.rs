// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod decoder;

use std::path::PathBuf;

use clap::Parser;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, BufReader};
use tracing::info;

use aprs_app::{init_logging, ConfigFile};

use config::{DecodeConfig, OutputFormat};

type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - APRS packet decoder");

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Read packets from FILE instead of stdin
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,
    /// Output format
    #[arg(short = 'o', long = "output", value_enum)]
    output: Option<OutputFormat>,
    /// Zone for local timestamps, minutes east of UTC
    #[arg(long = "utc-offset", value_name = "MIN", allow_hyphen_values = true)]
    utc_offset: Option<i32>,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

/// Command-line values win over the config file.
fn apply_cli(cli: &Cli, cfg: &mut DecodeConfig) {
    if let Some(output) = cli.output {
        cfg.decode.output = output;
    }
    if let Some(minutes) = cli.utc_offset {
        cfg.decode.utc_offset_minutes = Some(minutes);
    }
    if let Some(ref level) = cli.log_level {
        cfg.general.log_level = Some(level.clone());
    }
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", DecodeConfig::example_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = DecodeConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        DecodeConfig::load_from_default_paths()?
    };
    apply_cli(&cli, &mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid aprs-decode configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match cli.input {
        Some(ref path) => {
            let file = File::open(path)
                .await
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            info!("Reading packets from {}", path.display());
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stats = decoder::decode_lines(reader, io::stdout(), &cfg.decode).await?;
    info!(
        "Decode stats: read={}, decoded={}, failed={}, skipped={}, passed_through={}",
        stats.read, stats.decoded, stats.failed, stats.skipped, stats.passed_through
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "aprs-decode",
            "-o",
            "tnc2",
            "--utc-offset",
            "-300",
            "--log-level",
            "debug",
        ]);
        let mut cfg = DecodeConfig::default();
        apply_cli(&cli, &mut cfg);
        assert_eq!(cfg.decode.output, OutputFormat::Tnc2);
        assert_eq!(cfg.decode.utc_offset_minutes, Some(-300));
        assert_eq!(cfg.general.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_defaults_keep_config() {
        let cli = Cli::parse_from(["aprs-decode", "-i", "packets.txt"]);
        let mut cfg = DecodeConfig::default();
        cfg.decode.output = OutputFormat::Tnc2;
        apply_cli(&cli, &mut cfg);
        assert_eq!(cfg.decode.output, OutputFormat::Tnc2);
        assert_eq!(cli.input, Some(PathBuf::from("packets.txt")));
    }
}

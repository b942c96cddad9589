// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line-oriented decode loop.
//!
//! One packet per line. Blank lines and APRS-IS server comments (`#`) are
//! skipped; a line that fails to decode is logged and does not stop the run.

use aprs_core::{Packet, PacketFormat};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::{DecodeSettings, OutputFormat};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub read: u64,
    pub decoded: u64,
    pub failed: u64,
    pub skipped: u64,
    /// TNC2 lines echoed verbatim because the payload cannot be re-encoded.
    pub passed_through: u64,
}

pub async fn decode_lines<R, W>(
    mut reader: R,
    mut writer: W,
    settings: &DecodeSettings,
) -> std::io::Result<DecodeStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = DecodeStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        stats.read += 1;

        let line = trim_line_end(&buf);
        if line.is_empty() || line[0] == b'#' {
            stats.skipped += 1;
            continue;
        }

        let packet = match Packet::decode(line, &settings.reference_time()) {
            Ok(packet) => packet,
            Err(e) => {
                stats.failed += 1;
                warn!("line {}: {}", stats.read, e);
                continue;
            }
        };
        stats.decoded += 1;
        debug!(
            "line {}: {} {:?}",
            stats.read,
            packet.sender(),
            packet.info_field().packet_type()
        );

        let rendered = match settings.output {
            OutputFormat::Json => serde_json::to_string(&packet).map_err(std::io::Error::other)?,
            OutputFormat::Tnc2 => match packet.encode(PacketFormat::TextEnvelope) {
                Ok(text) => text,
                Err(e) => {
                    debug!("line {}: passing through ({})", stats.read, e);
                    stats.passed_through += 1;
                    String::from_utf8_lossy(line).into_owned()
                }
            },
        };
        writer.write_all(rendered.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    Ok(stats)
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(output: OutputFormat) -> DecodeSettings {
        DecodeSettings {
            output,
            ..DecodeSettings::default()
        }
    }

    async fn run(input: &str, output: OutputFormat) -> (DecodeStats, String) {
        let mut out = Vec::new();
        let stats = decode_lines(input.as_bytes(), &mut out, &settings(output))
            .await
            .unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
        assert_eq!(trim_line_end(b"\n"), b"");
    }

    #[tokio::test]
    async fn test_tnc2_output_and_stats() {
        let input = "# logresp N0CALL unverified\r\n\
                     N0CALL-9>APRS,WIDE1-1:!1234.56N/01234.56E-Test\r\n\
                     \r\n\
                     broken line\n\
                     W1AW>APRS:T#005,199,000\n\
                     N0CALL>APRS::WU2Z     :Testing{003";
        let (stats, out) = run(input, OutputFormat::Tnc2).await;
        assert_eq!(
            stats,
            DecodeStats {
                read: 6,
                decoded: 3,
                failed: 1,
                skipped: 2,
                passed_through: 1,
            }
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "N0CALL-9>APRS,WIDE1-1:!1234.56N/01234.56E-Test",
                "W1AW>APRS:T#005,199,000",
                "N0CALL>APRS::WU2Z     :Testing{003",
            ]
        );
    }

    #[tokio::test]
    async fn test_json_output() {
        let (stats, out) = run("N0CALL>APRS:>Hello\n", OutputFormat::Json).await;
        assert_eq!(stats.decoded, 1);
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["sender"], "N0CALL");
        assert_eq!(value["info_field"]["kind"], "status");
    }
}

// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use crate::error::{AprsError, AprsResult};
use crate::maidenhead::is_gridsquare;
use crate::packet_type::PacketType;
use crate::position::Position;

const GRID_ENCODE_LEN: usize = 8;

/// Obsolete Maidenhead locator beacon (`[IO91SX] comment`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaidenheadBeaconInfo {
    position: Position,
    comment: String,
}

impl MaidenheadBeaconInfo {
    pub fn new(position: Position, comment: impl Into<String>) -> Self {
        Self {
            position,
            comment: comment.into(),
        }
    }

    pub fn decode(payload: &str) -> AprsResult<Self> {
        let body = payload
            .strip_prefix('[')
            .ok_or_else(|| AprsError::format(format!("{:?} is not a locator beacon", payload)))?;
        let (grid, rest) = body
            .split_once(']')
            .ok_or_else(|| AprsError::format("locator beacon has no closing ']'"))?;
        if !is_gridsquare(grid) {
            return Err(AprsError::format(format!(
                "{:?} is not a 4 to 8 character locator",
                grid
            )));
        }

        Ok(Self {
            position: Position::decode_maidenhead(grid)?,
            comment: rest.strip_prefix(' ').unwrap_or(rest).to_string(),
        })
    }

    pub fn encode(&self) -> AprsResult<String> {
        let mut out = String::from("[");
        out.push_str(&self.position.encode_gridsquare(GRID_ENCODE_LEN, false)?);
        out.push(']');
        if !self.comment.is_empty() {
            out.push(' ');
            out.push_str(&self.comment);
        }
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType::MaidenheadGridLocatorBeacon
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_round_trip() {
        for payload in ["[IO91SX] 35 miles NNW of London", "[IO91]", "[JO62QM45] home"] {
            let beacon = MaidenheadBeaconInfo::decode(payload).unwrap();
            assert_eq!(beacon.encode().unwrap(), payload);
        }
    }

    #[test]
    fn test_decode_fields() {
        let beacon = MaidenheadBeaconInfo::decode("[IO91SX] hello").unwrap();
        assert_eq!(beacon.position().ambiguity(), 2);
        assert_eq!(beacon.comment(), "hello");
        assert_eq!(beacon.packet_type(), PacketType::MaidenheadGridLocatorBeacon);
    }

    #[test]
    fn test_rejects_malformed_beacons() {
        for payload in ["[IO91SX", "[IO9] x", "[IO91SX/-]", "IO91SX]", "[]"] {
            assert!(
                matches!(MaidenheadBeaconInfo::decode(payload), Err(AprsError::Format(_))),
                "{:?}",
                payload
            );
        }
    }
}

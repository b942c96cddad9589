// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use crate::clock::ReferenceTime;
use crate::error::{AprsError, AprsResult};
use crate::packet_type::PacketType;
use crate::position::{Position, LAT_LONG_BLOCK_LEN};
use crate::timestamp::{Timestamp, TimestampType};

const TIMESTAMP_LEN: usize = 7;

/// Position report (`!`, `=`, `/`, `@`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionInfo {
    packet_type: PacketType,
    has_messaging: bool,
    timestamp: Option<Timestamp>,
    position: Position,
    comment: String,
}

impl PositionInfo {
    pub fn new(
        position: Position,
        timestamp: Option<Timestamp>,
        has_messaging: bool,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            packet_type: PacketType::for_position(timestamp.is_some(), has_messaging),
            has_messaging,
            timestamp,
            position,
            comment: comment.into(),
        }
    }

    pub fn decode(payload: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        let (has_timestamp, has_messaging) = match payload.as_bytes().first() {
            Some(b'!') => (false, false),
            Some(b'=') => (false, true),
            Some(b'/') => (true, false),
            Some(b'@') => (true, true),
            _ => {
                return Err(AprsError::format(format!(
                    "{:?} is not a position report",
                    payload
                )))
            }
        };
        let mut rest = &payload[1..];

        let timestamp = if has_timestamp {
            let stamp = rest.get(..TIMESTAMP_LEN).ok_or_else(|| {
                AprsError::format("position report too short for its timestamp")
            })?;
            rest = &rest[TIMESTAMP_LEN..];
            Some(Timestamp::decode(stamp, reference)?)
        } else {
            None
        };

        match rest.as_bytes().first() {
            Some(b) if b.is_ascii_digit() => {}
            Some(_) => {
                return Err(AprsError::not_supported(
                    "compressed position reports",
                ))
            }
            None => return Err(AprsError::format("position report has no position")),
        }
        let block = rest
            .get(..LAT_LONG_BLOCK_LEN)
            .ok_or_else(|| AprsError::format("position block truncated"))?;
        let position = Position::decode_lat_long(block)?;

        Ok(Self {
            packet_type: PacketType::for_position(has_timestamp, has_messaging),
            has_messaging,
            timestamp,
            position,
            comment: rest[LAT_LONG_BLOCK_LEN..].to_string(),
        })
    }

    /// Encode, re-using the decoded timestamp grammar (DHMz for a
    /// timestamp built from an instant).
    pub fn encode(&self) -> AprsResult<String> {
        let timestamp_type = self
            .timestamp
            .as_ref()
            .map_or(TimestampType::Dhmz, Timestamp::preferred_type);
        self.encode_with(timestamp_type)
    }

    /// Encode with an explicit timestamp grammar. Ignored without a timestamp.
    pub fn encode_with(&self, timestamp_type: TimestampType) -> AprsResult<String> {
        let mut out = self.encode_header(timestamp_type)?;
        out.push_str(&self.comment);
        Ok(out)
    }

    /// Identifier, timestamp and position block; everything but the comment.
    pub(crate) fn encode_header(&self, timestamp_type: TimestampType) -> AprsResult<String> {
        let identifier = self.packet_type.identifier().ok_or_else(|| {
            AprsError::not_supported(format!("{:?} has no identifier", self.packet_type))
        })?;

        let capacity = 1 + TIMESTAMP_LEN + LAT_LONG_BLOCK_LEN + self.comment.len();
        let mut out = String::with_capacity(capacity);
        out.push(identifier);
        if let Some(timestamp) = &self.timestamp {
            if timestamp_type.encoded_len() != Some(TIMESTAMP_LEN) {
                return Err(AprsError::not_supported(format!(
                    "{:?} timestamps in position reports",
                    timestamp_type
                )));
            }
            out.push_str(&timestamp.encode(timestamp_type)?);
        }
        out.push_str(&self.position.encode_lat_long()?);
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn has_messaging(&self) -> bool {
        self.has_messaging
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn replace_comment(&mut self, comment: String) {
        self.comment = comment;
    }
}

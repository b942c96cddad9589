// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use crate::clock::ReferenceTime;
use crate::error::{AprsError, AprsResult};
use crate::maidenhead::is_gridsquare;
use crate::packet_type::PacketType;
use crate::position::Position;
use crate::timestamp::Timestamp;

const GRID_ENCODE_LEN: usize = 8;
const DHM_LEN: usize = 7;

/// What precedes the status text. A status carries a grid or a
/// timestamp, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusPrefix {
    Maidenhead {
        position: Position,
        has_symbol: bool,
    },
    Timestamp { timestamp: Timestamp },
    None,
}

/// Status report (`>`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusInfo {
    prefix: StatusPrefix,
    comment: String,
}

impl StatusInfo {
    pub fn with_maidenhead(position: Position, comment: impl Into<String>) -> Self {
        Self {
            prefix: StatusPrefix::Maidenhead {
                position,
                has_symbol: true,
            },
            comment: comment.into(),
        }
    }

    pub fn with_timestamp(timestamp: Timestamp, comment: impl Into<String>) -> Self {
        Self {
            prefix: StatusPrefix::Timestamp { timestamp },
            comment: comment.into(),
        }
    }

    pub fn comment_only(comment: impl Into<String>) -> Self {
        Self {
            prefix: StatusPrefix::None,
            comment: comment.into(),
        }
    }

    pub fn decode(payload: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        let body = payload
            .strip_prefix('>')
            .ok_or_else(|| AprsError::format(format!("{:?} is not a status report", payload)))?;

        let (head, tail) = match body.split_once(' ') {
            Some((head, tail)) => (head, tail),
            None => (body, ""),
        };
        let head_bytes = head.as_bytes();
        let grid = match head_bytes.len() {
            n if n >= 2 && !head_bytes[n - 2].is_ascii_alphanumeric() => head.get(..n - 2),
            _ => Some(head),
        };
        if let Some(grid) = grid.filter(|grid| is_gridsquare(grid)) {
            let position = Position::decode_maidenhead(head)?;
            return Ok(Self {
                prefix: StatusPrefix::Maidenhead {
                    position,
                    has_symbol: grid.len() != head.len(),
                },
                comment: tail.to_string(),
            });
        }

        if let Some(stamp) = body.get(..DHM_LEN).filter(|s| looks_like_dhm(s)) {
            let timestamp = Timestamp::decode(stamp, reference)?;
            return Ok(Self::with_timestamp(timestamp, &body[DHM_LEN..]));
        }

        Ok(Self::comment_only(body))
    }

    /// Only the grid form has an encoding; the other forms are decode-only.
    pub fn encode(&self) -> AprsResult<String> {
        let StatusPrefix::Maidenhead {
            position,
            has_symbol,
        } = &self.prefix
        else {
            return Err(AprsError::not_supported(
                "status reports without a grid locator",
            ));
        };
        let mut out = String::from(">");
        out.push_str(&position.encode_gridsquare(GRID_ENCODE_LEN, *has_symbol)?);
        if !self.comment.is_empty() {
            out.push(' ');
            out.push_str(&self.comment);
        }
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType::Status
    }

    pub fn prefix(&self) -> &StatusPrefix {
        &self.prefix
    }

    pub fn position(&self) -> Option<&Position> {
        match &self.prefix {
            StatusPrefix::Maidenhead { position, .. } => Some(position),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        match &self.prefix {
            StatusPrefix::Timestamp { timestamp } => Some(timestamp),
            _ => None,
        }
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

fn looks_like_dhm(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == DHM_LEN
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && matches!(bytes[6], b'z' | b'/')
}

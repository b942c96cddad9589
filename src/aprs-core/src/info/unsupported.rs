// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use crate::error::{AprsError, AprsResult};
use crate::packet_type::PacketType;

/// Payload of a type this codec does not parse, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedInfo {
    packet_type: PacketType,
    payload: String,
}

impl UnsupportedInfo {
    pub fn new(packet_type: PacketType, payload: impl Into<String>) -> Self {
        Self {
            packet_type,
            payload: payload.into(),
        }
    }

    /// Always fails: an unparsed payload cannot be re-encoded safely.
    /// [`UnsupportedInfo::payload`] still gives the original text.
    pub fn encode(&self) -> AprsResult<String> {
        Err(AprsError::not_supported(format!(
            "encoding {:?} information fields",
            self.packet_type
        )))
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_payload_and_refuses_encode() {
        let payload = "T#005,199,000,255,073,123,01101001";
        let info = UnsupportedInfo::new(PacketType::TelemetryData, payload);
        assert_eq!(info.packet_type(), PacketType::TelemetryData);
        assert_eq!(info.payload(), payload);
        assert!(matches!(info.encode(), Err(AprsError::NotSupported(_))));
    }
}

// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Packet envelope: `SENDER>PATH,...:PAYLOAD` text, or an AX.25 UI frame.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::ax25;
use crate::clock::ReferenceTime;
use crate::error::{AprsError, AprsResult};
use crate::info::InfoField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketFormat {
    /// TNC2 text: `SENDER>PATH1,PATH2:PAYLOAD`.
    TextEnvelope,
    /// AX.25 UI frame between 0x7E delimiters.
    BinaryEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    sender: String,
    /// Only known for packets decoded from the binary envelope.
    destination: Option<String>,
    path: Vec<String>,
    /// Decode instant; `None` for packets built in code.
    received_time: Option<DateTime<Utc>>,
    info_field: InfoField,
}

impl Packet {
    pub fn new(
        sender: impl Into<String>,
        path: Vec<String>,
        info_field: InfoField,
    ) -> AprsResult<Self> {
        let sender = sender.into();
        if sender.is_empty() {
            return Err(AprsError::format("packet sender is empty"));
        }
        Ok(Self {
            sender,
            destination: None,
            path,
            received_time: None,
            info_field,
        })
    }

    /// Decode one frame, trying the text envelope before the binary one.
    pub fn decode(raw: &[u8], reference: &ReferenceTime) -> AprsResult<Self> {
        let framed = ax25::is_framed(raw);
        if let Ok(text) = std::str::from_utf8(raw) {
            match Self::decode_str(text, reference) {
                Ok(packet) => return Ok(packet),
                Err(err) if !framed => return Err(err),
                Err(err) => debug!(%err, "not a text envelope, trying AX.25"),
            }
        }
        if framed {
            return Self::decode_binary(raw, reference);
        }
        Err(AprsError::format(
            "input matches neither the text nor the binary envelope",
        ))
    }

    pub fn decode_str(text: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        let (sender, rest) = text
            .split_once('>')
            .ok_or_else(|| AprsError::format("no '>' after the sender"))?;
        let (path, payload) = rest
            .split_once(':')
            .ok_or_else(|| AprsError::format("no ':' after the path"))?;
        if sender.is_empty() {
            return Err(AprsError::format("packet sender is empty"));
        }

        let path = if path.is_empty() {
            Vec::new()
        } else {
            path.split(',').map(str::to_string).collect()
        };

        Ok(Self {
            sender: sender.to_string(),
            destination: None,
            path,
            received_time: Some(reference.now()),
            info_field: InfoField::decode(payload, reference)?,
        })
    }

    fn decode_binary(raw: &[u8], reference: &ReferenceTime) -> AprsResult<Self> {
        let frame = ax25::parse_frame(raw)?;
        let sender = frame.source.to_string();
        if sender.is_empty() {
            return Err(AprsError::format("AX.25 source address is empty"));
        }
        let payload = std::str::from_utf8(&frame.info)
            .map_err(|e| AprsError::format(format!("AX.25 info field is not UTF-8: {}", e)))?;

        Ok(Self {
            sender,
            destination: Some(frame.destination.to_string()),
            path: frame.digipeaters.iter().map(ToString::to_string).collect(),
            received_time: Some(reference.now()),
            info_field: InfoField::decode(payload, reference)?,
        })
    }

    /// Encode the packet. A binary-decoded destination is written as the
    /// first path element of the text envelope.
    pub fn encode(&self, format: PacketFormat) -> AprsResult<String> {
        match format {
            PacketFormat::TextEnvelope => {
                let path: Vec<&str> = self
                    .destination
                    .iter()
                    .chain(self.path.iter())
                    .map(String::as_str)
                    .collect();
                Ok(format!(
                    "{}>{}:{}",
                    self.sender,
                    path.join(","),
                    self.info_field.encode()?
                ))
            }
            PacketFormat::BinaryEnvelope => Err(AprsError::not_supported(
                "encoding the AX.25 binary envelope",
            )),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn received_time(&self) -> Option<DateTime<Utc>> {
        self.received_time
    }

    pub fn info_field(&self) -> &InfoField {
        &self.info_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ax25::tests::build_frame;
    use crate::info::{MessageInfo, PositionInfo};
    use crate::packet_type::PacketType;
    use crate::position::{Coordinates, Position};
    use chrono::TimeZone;

    fn reference() -> ReferenceTime {
        ReferenceTime::utc(Utc.with_ymd_and_hms(2016, 10, 24, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_text_envelope_with_path() {
        let line = "N0CALL-9>APRS,WIDE1-1,WIDE2-1:!1234.56N/01234.56E-Test";
        let packet = Packet::decode_str(line, &reference()).unwrap();
        assert_eq!(packet.sender(), "N0CALL-9");
        assert_eq!(packet.destination(), None);
        assert_eq!(packet.path(), ["APRS", "WIDE1-1", "WIDE2-1"]);
        assert_eq!(packet.received_time(), Some(reference().now()));
        assert_eq!(
            packet.info_field().packet_type(),
            PacketType::PositionWithoutTimestampNoMessaging
        );
        assert_eq!(packet.encode(PacketFormat::TextEnvelope).unwrap(), line);
    }

    #[test]
    fn test_text_envelope_without_path() {
        let line = "W1AW>:>IO91SX/- Test status";
        let packet = Packet::decode(line.as_bytes(), &reference()).unwrap();
        assert!(packet.path().is_empty());
        assert_eq!(packet.encode(PacketFormat::TextEnvelope).unwrap(), line);
    }

    #[test]
    fn test_payload_may_contain_separators() {
        let line = "N0CALL>APRS::WU2Z     :a>b:c{1";
        let packet = Packet::decode_str(line, &reference()).unwrap();
        match packet.info_field() {
            InfoField::Message(msg) => assert_eq!(msg.content(), "a>b:c"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(packet.encode(PacketFormat::TextEnvelope).unwrap(), line);
    }

    #[test]
    fn test_rejects_malformed_text() {
        let reference = reference();
        for line in ["N0CALL APRS:>x", "N0CALL>APRS>x", ">APRS:>x", "N0CALL>APRS:"] {
            assert!(
                matches!(Packet::decode(line.as_bytes(), &reference), Err(AprsError::Format(_))),
                "{:?}",
                line
            );
        }
    }

    #[test]
    fn test_binary_envelope() {
        let raw = build_frame(
            "APRS",
            ("N0CALL", 9),
            &[("WIDE1", 1), ("WIDE2", 2)],
            b"/092345z4903.50N/07201.75W>Test1234",
        );
        let packet = Packet::decode(&raw, &reference()).unwrap();
        assert_eq!(packet.sender(), "N0CALL-9");
        assert_eq!(packet.destination(), Some("APRS"));
        assert_eq!(packet.path(), ["WIDE1-1", "WIDE2-2"]);
        assert_eq!(
            packet.encode(PacketFormat::TextEnvelope).unwrap(),
            "N0CALL-9>APRS,WIDE1-1,WIDE2-2:/092345z4903.50N/07201.75W>Test1234"
        );
        assert!(matches!(
            packet.encode(PacketFormat::BinaryEnvelope),
            Err(AprsError::NotSupported(_))
        ));
    }

    #[test]
    fn test_binary_payload_errors_surface() {
        let raw = build_frame("APRS", ("N0CALL", 0), &[], b"!9103.50N/07201.75W>");
        assert!(matches!(
            Packet::decode(&raw, &reference()),
            Err(AprsError::Range(_))
        ));
    }

    #[test]
    fn test_binary_payload_must_be_utf8() {
        let raw = build_frame("APRS", ("N0CALL", 0), &[], b">caf\xe9");
        assert!(matches!(
            Packet::decode(&raw, &reference()),
            Err(AprsError::Format(_))
        ));
    }

    #[test]
    fn test_constructed_packet_has_no_received_time() {
        let coordinates = Coordinates::new(49.0583, -72.0292).unwrap();
        let position = Position::new(coordinates, '/', '>', 0).unwrap();
        let info = PositionInfo::new(position, None, true, "hi");
        let packet = Packet::new("N0CALL", vec!["WIDE1-1".to_string()], info.into()).unwrap();
        assert_eq!(packet.received_time(), None);
        assert_eq!(
            packet.encode(PacketFormat::TextEnvelope).unwrap(),
            "N0CALL>WIDE1-1:=4903.50N/07201.75W>hi"
        );

        let message = MessageInfo::new("N0CALL", "hi", None).unwrap();
        assert!(matches!(
            Packet::new("", Vec::new(), message.into()),
            Err(AprsError::Format(_))
        ));
    }

    #[test]
    fn test_serializes_to_json() {
        let packet = Packet::decode_str("N0CALL>APRS:>Hello", &reference()).unwrap();
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["sender"], "N0CALL");
        assert_eq!(json["path"][0], "APRS");
        assert_eq!(json["info_field"]["kind"], "status");
        assert_eq!(json["info_field"]["info"]["comment"], "Hello");
    }
}

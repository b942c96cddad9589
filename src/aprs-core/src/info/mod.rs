// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Information field variants and the dispatcher that picks one from the
//! payload's data type identifier.

mod maidenhead;
mod message;
mod position;
mod status;
mod unsupported;
mod weather;

use serde::Serialize;
use tracing::debug;

use crate::clock::ReferenceTime;
use crate::error::{AprsError, AprsResult};
use crate::packet_type::PacketType;

pub use maidenhead::MaidenheadBeaconInfo;
pub use message::MessageInfo;
pub use position::PositionInfo;
pub use status::{StatusInfo, StatusPrefix};
pub use unsupported::UnsupportedInfo;
pub use weather::{Weather, WeatherInfo};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "info", rename_all = "snake_case")]
pub enum InfoField {
    Position(PositionInfo),
    Weather(WeatherInfo),
    Status(StatusInfo),
    Message(MessageInfo),
    MaidenheadBeacon(MaidenheadBeaconInfo),
    Unsupported(UnsupportedInfo),
}

impl InfoField {
    /// Decode a payload. Types without a parser come back as
    /// [`InfoField::Unsupported`] rather than failing.
    pub fn decode(payload: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        let identifier = payload
            .chars()
            .next()
            .ok_or_else(|| AprsError::format("empty information field"))?;
        let packet_type = PacketType::from_identifier(identifier);
        debug!(?packet_type, "dispatching information field");

        let info = match packet_type {
            PacketType::PositionWithoutTimestampNoMessaging
            | PacketType::PositionWithoutTimestampWithMessaging
            | PacketType::PositionWithTimestampNoMessaging
            | PacketType::PositionWithTimestampWithMessaging => {
                let report = PositionInfo::decode(payload, reference)?;
                if report.position().is_weather_symbol() {
                    InfoField::Weather(WeatherInfo::from_position_report(report)?)
                } else {
                    InfoField::Position(report)
                }
            }
            PacketType::Status => InfoField::Status(StatusInfo::decode(payload, reference)?),
            PacketType::Message => InfoField::Message(MessageInfo::decode(payload)?),
            PacketType::MaidenheadGridLocatorBeacon => {
                InfoField::MaidenheadBeacon(MaidenheadBeaconInfo::decode(payload)?)
            }
            other => InfoField::Unsupported(UnsupportedInfo::new(other, payload)),
        };
        Ok(info)
    }

    pub fn encode(&self) -> AprsResult<String> {
        match self {
            InfoField::Position(info) => info.encode(),
            InfoField::Weather(info) => info.encode(),
            InfoField::Status(info) => info.encode(),
            InfoField::Message(info) => info.encode(),
            InfoField::MaidenheadBeacon(info) => info.encode(),
            InfoField::Unsupported(info) => info.encode(),
        }
    }

    pub fn packet_type(&self) -> PacketType {
        match self {
            InfoField::Position(info) => info.packet_type(),
            InfoField::Weather(info) => info.packet_type(),
            InfoField::Status(info) => info.packet_type(),
            InfoField::Message(info) => info.packet_type(),
            InfoField::MaidenheadBeacon(info) => info.packet_type(),
            InfoField::Unsupported(info) => info.packet_type(),
        }
    }
}

impl From<PositionInfo> for InfoField {
    fn from(info: PositionInfo) -> Self {
        InfoField::Position(info)
    }
}

impl From<WeatherInfo> for InfoField {
    fn from(info: WeatherInfo) -> Self {
        InfoField::Weather(info)
    }
}

impl From<StatusInfo> for InfoField {
    fn from(info: StatusInfo) -> Self {
        InfoField::Status(info)
    }
}

impl From<MessageInfo> for InfoField {
    fn from(info: MessageInfo) -> Self {
        InfoField::Message(info)
    }
}

impl From<MaidenheadBeaconInfo> for InfoField {
    fn from(info: MaidenheadBeaconInfo) -> Self {
        InfoField::MaidenheadBeacon(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet_type::IDENTIFIERS;
    use chrono::{TimeZone, Utc};

    fn reference() -> ReferenceTime {
        ReferenceTime::utc(Utc.with_ymd_and_hms(2016, 10, 24, 12, 0, 0).unwrap())
    }

    fn minimal_payload(identifier: char) -> String {
        let body = match identifier {
            '!' | '=' => "4903.50N/07201.75W>",
            '/' | '@' => "092345z4903.50N/07201.75W>",
            ':' => "N0CALL   :hi",
            '[' => "IO91]",
            _ => "x",
        };
        format!("{}{}", identifier, body)
    }

    #[test]
    fn test_dispatch_covers_every_identifier() {
        let reference = reference();
        for (identifier, packet_type) in IDENTIFIERS {
            let payload = minimal_payload(identifier);
            let info = InfoField::decode(&payload, &reference).unwrap();
            assert_eq!(info.packet_type(), packet_type, "{:?}", payload);
        }
    }

    #[test]
    fn test_unmapped_identifiers_fall_back_to_unsupported() {
        let reference = reference();
        for (payload, packet_type) in [
            ("\"abc", PacketType::Unused),
            ("]abc", PacketType::Unused),
            ("9abc", PacketType::DoNotUse),
            ("|abc", PacketType::DoNotUse),
            (" abc", PacketType::Unknown),
            ("ébc", PacketType::Unknown),
        ] {
            match InfoField::decode(payload, &reference).unwrap() {
                InfoField::Unsupported(info) => {
                    assert_eq!(info.packet_type(), packet_type);
                    assert_eq!(info.payload(), payload);
                }
                other => panic!("{:?} decoded as {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_lowercase_identifier_is_uppercased() {
        let info = InfoField::decode("t#005,199", &reference()).unwrap();
        assert_eq!(info.packet_type(), PacketType::TelemetryData);
    }

    #[test]
    fn test_weather_symbol_selects_weather_variant() {
        let info = InfoField::decode(
            "!4903.50N/07201.75W_220/004g005t077r000p000P000h50b09900",
            &reference(),
        )
        .unwrap();
        assert!(matches!(info, InfoField::Weather(_)));
        assert_eq!(
            info.packet_type(),
            PacketType::PositionWithoutTimestampNoMessaging
        );
    }

    #[test]
    fn test_round_trips_supported_variants() {
        let reference = reference();
        for payload in [
            "/092345z4903.50N/07201.75W>Test1234",
            "=4903.5 N/07201.7 W-",
            "@092345z4903.50N\\07201.75W_220/004g005t077r000p000P000h50b09900wRSW",
            ">IO91SX/- status",
            ":WU2Z     :Testing{003",
            "[IO91SX] beacon",
        ] {
            let info = InfoField::decode(payload, &reference).unwrap();
            let encoded = info.encode().unwrap();
            assert_eq!(encoded, payload);
            assert_eq!(InfoField::decode(&encoded, &reference).unwrap(), info);
        }
    }

    #[test]
    fn test_decode_errors_surface() {
        let reference = reference();
        assert!(matches!(
            InfoField::decode("", &reference),
            Err(AprsError::Format(_))
        ));
        assert!(matches!(
            InfoField::decode("!9103.50N/07201.75W>", &reference),
            Err(AprsError::Range(_))
        ));
        assert!(matches!(
            InfoField::decode("!/5L!!<*e7>7P[", &reference),
            Err(AprsError::NotSupported(_))
        ));
        assert!(matches!(
            InfoField::decode("}N0CALL>APRS:hi", &reference).unwrap().encode(),
            Err(AprsError::NotSupported(_))
        ));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let info = InfoField::decode(":WU2Z     :Testing{003", &reference()).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["kind"], "message");
        assert_eq!(json["info"]["addressee"], "WU2Z");
        assert_eq!(json["info"]["message_id"], "003");
    }
}

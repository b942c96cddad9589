// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! APRS data type identifiers (the first character of an information field).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PacketType {
    CurrentMicEDataRev0,
    OldMicEDataRev0,
    PositionWithoutTimestampNoMessaging,
    PeetBrosUIIWeatherStation,
    RawGpsData,
    AgreloDfJrMicroFinder,
    MapFeature,
    OldMicEData,
    Item,
    PeetBrosUIIWeatherStationPacket,
    ShelterDataWithTime,
    InvalidOrTestData,
    SpaceWeather,
    PositionWithTimestampNoMessaging,
    Message,
    Object,
    StationCapabilities,
    PositionWithoutTimestampWithMessaging,
    Status,
    Query,
    PositionWithTimestampWithMessaging,
    TelemetryData,
    MaidenheadGridLocatorBeacon,
    WeatherReport,
    CurrentMicEData,
    UserDefinedAprsPacketFormat,
    ThirdPartyTraffic,
    /// Reserved by the protocol but unassigned.
    Unused,
    /// Explicitly reserved; must not be used as an identifier.
    DoNotUse,
    Unknown,
}

/// Identifier character for every encodable packet type.
pub const IDENTIFIERS: [(char, PacketType); 27] = [
    ('\u{1c}', PacketType::CurrentMicEDataRev0),
    ('\u{1d}', PacketType::OldMicEDataRev0),
    ('!', PacketType::PositionWithoutTimestampNoMessaging),
    ('#', PacketType::PeetBrosUIIWeatherStation),
    ('$', PacketType::RawGpsData),
    ('%', PacketType::AgreloDfJrMicroFinder),
    ('&', PacketType::MapFeature),
    ('\'', PacketType::OldMicEData),
    (')', PacketType::Item),
    ('*', PacketType::PeetBrosUIIWeatherStationPacket),
    ('+', PacketType::ShelterDataWithTime),
    (',', PacketType::InvalidOrTestData),
    ('.', PacketType::SpaceWeather),
    ('/', PacketType::PositionWithTimestampNoMessaging),
    (':', PacketType::Message),
    (';', PacketType::Object),
    ('<', PacketType::StationCapabilities),
    ('=', PacketType::PositionWithoutTimestampWithMessaging),
    ('>', PacketType::Status),
    ('?', PacketType::Query),
    ('@', PacketType::PositionWithTimestampWithMessaging),
    ('T', PacketType::TelemetryData),
    ('[', PacketType::MaidenheadGridLocatorBeacon),
    ('_', PacketType::WeatherReport),
    ('`', PacketType::CurrentMicEData),
    ('{', PacketType::UserDefinedAprsPacketFormat),
    ('}', PacketType::ThirdPartyTraffic),
];

const UNUSED: [char; 6] = ['"', '(', '-', '\\', ']', '^'];

impl PacketType {
    /// Map an identifier character to its packet type. Letters are
    /// uppercased first, so `t` selects telemetry.
    pub fn from_identifier(c: char) -> Self {
        let c = c.to_ascii_uppercase();
        if let Some((_, ty)) = IDENTIFIERS.iter().find(|(id, _)| *id == c) {
            return *ty;
        }
        if UNUSED.contains(&c) {
            PacketType::Unused
        } else if c.is_ascii_alphanumeric() || c == '|' || c == '~' {
            PacketType::DoNotUse
        } else {
            PacketType::Unknown
        }
    }

    /// Identifier character; `None` for the sentinel types.
    pub fn identifier(self) -> Option<char> {
        IDENTIFIERS
            .iter()
            .find(|(_, ty)| *ty == self)
            .map(|(id, _)| *id)
    }

    pub fn is_sentinel(self) -> bool {
        matches!(
            self,
            PacketType::Unused | PacketType::DoNotUse | PacketType::Unknown
        )
    }

    pub(crate) fn for_position(has_timestamp: bool, has_messaging: bool) -> Self {
        match (has_timestamp, has_messaging) {
            (false, false) => PacketType::PositionWithoutTimestampNoMessaging,
            (false, true) => PacketType::PositionWithoutTimestampWithMessaging,
            (true, false) => PacketType::PositionWithTimestampNoMessaging,
            (true, true) => PacketType::PositionWithTimestampWithMessaging,
        }
    }
}

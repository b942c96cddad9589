// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! APRS packet and information field codec.
//!
//! Decoding is pure: every operation that has to guess a date takes a
//! [`ReferenceTime`] instead of reading the clock.

mod ax25;
pub mod clock;
pub mod error;
pub mod info;
pub mod maidenhead;
pub mod packet;
pub mod packet_type;
pub mod position;
pub mod timestamp;

pub use clock::ReferenceTime;
pub use error::{AprsError, AprsResult};
pub use info::{
    InfoField, MaidenheadBeaconInfo, MessageInfo, PositionInfo, StatusInfo, StatusPrefix,
    UnsupportedInfo, Weather, WeatherInfo,
};
pub use packet::{Packet, PacketFormat};
pub use packet_type::PacketType;
pub use position::{Coordinates, Position};
pub use timestamp::{Timestamp, TimestampType};

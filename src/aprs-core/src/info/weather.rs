// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Complete weather reports: a position report carrying the weather symbol
//! whose comment starts with a block of fixed-width measurements.
//!
//! ```text
//! 220/004g005t077r000p000P000h50b09900 comment
//! ```

use serde::Serialize;
use tracing::trace;

use super::position::PositionInfo;
use crate::clock::ReferenceTime;
use crate::error::{AprsError, AprsResult};
use crate::packet_type::PacketType;
use crate::timestamp::{Timestamp, TimestampType};

/// Luminosity at or above this value is sent with the `l` tag, offset by it.
const LUMINOSITY_HIGH_RANGE: i32 = 1000;

/// Measurements from a weather report. `None` means the station did not
/// report the value, which is distinct from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Weather {
    /// Degrees.
    pub wind_direction: Option<i32>,
    /// Sustained one-minute wind speed, mph.
    pub wind_speed: Option<i32>,
    /// Peak wind speed in the last five minutes, mph.
    pub wind_gust: Option<i32>,
    /// Degrees Fahrenheit.
    pub temperature: Option<i32>,
    /// Hundredths of an inch.
    pub rain_last_hour: Option<i32>,
    /// Hundredths of an inch.
    pub rain_last_24_hours: Option<i32>,
    /// Hundredths of an inch.
    pub rain_since_midnight: Option<i32>,
    /// Percent, 1 to 100.
    pub humidity: Option<i32>,
    /// Tenths of a millibar.
    pub barometric_pressure: Option<i32>,
    /// W/m².
    pub luminosity: Option<i32>,
    /// Inches in the last 24 hours.
    pub snowfall: Option<i32>,
    pub raw_rain_counter: Option<i32>,
}

impl Weather {
    /// Parse the measurement block at the start of `comment`, returning
    /// the measurements and whatever free text follows them.
    pub fn parse(comment: &str) -> (Self, &str) {
        let mut weather = Weather::default();
        let mut rest = comment;

        if let Some((direction, speed)) = wind_block(rest) {
            weather.wind_direction = direction;
            weather.wind_speed = speed;
            rest = &rest[7..];
        }

        loop {
            let Some(tag) = rest.chars().next() else {
                break;
            };
            let Some(width) = tag_width(tag) else {
                break;
            };
            let value = rest
                .get(1..1 + width)
                .and_then(|text| field_value(text, tag == 't'));
            let Some(value) = value else {
                break;
            };
            trace!(tag = %tag, ?value, "weather field");
            let slot = match tag {
                'g' => &mut weather.wind_gust,
                't' => &mut weather.temperature,
                'r' => &mut weather.rain_last_hour,
                'p' => &mut weather.rain_last_24_hours,
                'P' => &mut weather.rain_since_midnight,
                'h' => &mut weather.humidity,
                'b' => &mut weather.barometric_pressure,
                'L' | 'l' => &mut weather.luminosity,
                's' => &mut weather.snowfall,
                _ => &mut weather.raw_rain_counter,
            };
            *slot = match (tag, value) {
                ('h', Some(0)) => Some(100),
                ('l', Some(v)) => Some(v + LUMINOSITY_HIGH_RANGE),
                (_, v) => v,
            };
            rest = &rest[1 + width..];
        }

        (weather, rest)
    }

    /// Encode the primary block in fixed order, with placeholders for
    /// missing values, then any extended fields that are present.
    pub fn encode(&self) -> AprsResult<String> {
        let mut out = String::with_capacity(48);
        out.push_str(&field("wind direction", self.wind_direction, 3, false)?);
        out.push('/');
        out.push_str(&field("wind speed", self.wind_speed, 3, false)?);
        out.push('g');
        out.push_str(&field("wind gust", self.wind_gust, 3, false)?);
        out.push('t');
        out.push_str(&field("temperature", self.temperature, 3, true)?);
        out.push('r');
        out.push_str(&field("rain last hour", self.rain_last_hour, 3, false)?);
        out.push('p');
        out.push_str(&field("rain last 24 hours", self.rain_last_24_hours, 3, false)?);
        out.push('P');
        out.push_str(&field("rain since midnight", self.rain_since_midnight, 3, false)?);
        out.push('h');
        let humidity = match self.humidity {
            Some(100) => Some(0),
            Some(h) if !(1..100).contains(&h) => {
                return Err(AprsError::range(format!("humidity {}", h)))
            }
            other => other,
        };
        out.push_str(&field("humidity", humidity, 2, false)?);
        out.push('b');
        out.push_str(&field("pressure", self.barometric_pressure, 5, false)?);

        if let Some(luminosity) = self.luminosity {
            if luminosity >= LUMINOSITY_HIGH_RANGE {
                out.push('l');
                let offset = luminosity - LUMINOSITY_HIGH_RANGE;
                out.push_str(&field("luminosity", Some(offset), 3, false)?);
            } else {
                out.push('L');
                out.push_str(&field("luminosity", Some(luminosity), 3, false)?);
            }
        }
        if self.snowfall.is_some() {
            out.push('s');
            out.push_str(&field("snowfall", self.snowfall, 3, false)?);
        }
        if self.raw_rain_counter.is_some() {
            out.push('#');
            out.push_str(&field("raw rain counter", self.raw_rain_counter, 3, false)?);
        }
        Ok(out)
    }
}

/// Position report with the weather symbol and parsed measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherInfo {
    report: PositionInfo,
    weather: Weather,
}

impl WeatherInfo {
    /// `report` must carry the weather symbol; its comment is the free text
    /// that follows the measurements.
    pub fn new(report: PositionInfo, weather: Weather) -> AprsResult<Self> {
        if !report.position().is_weather_symbol() {
            return Err(AprsError::format("weather reports need the weather symbol"));
        }
        Ok(Self { report, weather })
    }

    /// Split the measurements off a decoded position report's comment.
    pub fn from_position_report(mut report: PositionInfo) -> AprsResult<Self> {
        let (weather, comment) = Weather::parse(report.comment());
        let comment = comment.to_string();
        report.replace_comment(comment);
        Self::new(report, weather)
    }

    pub fn decode(payload: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        Self::from_position_report(PositionInfo::decode(payload, reference)?)
    }

    pub fn encode(&self) -> AprsResult<String> {
        let timestamp_type = self
            .report
            .timestamp()
            .map_or(TimestampType::Dhmz, Timestamp::preferred_type);
        let mut out = self.report.encode_header(timestamp_type)?;
        out.push_str(&self.weather.encode()?);
        out.push_str(self.report.comment());
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        self.report.packet_type()
    }

    pub fn report(&self) -> &PositionInfo {
        &self.report
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }
}

fn wind_block(s: &str) -> Option<(Option<i32>, Option<i32>)> {
    let block = s.get(..7)?;
    if block.as_bytes()[3] != b'/' {
        return None;
    }
    let direction = field_value(&block[..3], false)?;
    let speed = field_value(&block[4..], false)?;
    Some((direction, speed))
}

fn tag_width(tag: char) -> Option<usize> {
    match tag {
        'g' | 't' | 'r' | 'p' | 'P' | 'L' | 'l' | 's' | '#' => Some(3),
        'h' => Some(2),
        'b' => Some(5),
        _ => None,
    }
}

/// `Some(None)` for a placeholder, `Some(Some(v))` for a number, `None`
/// when the text is not a weather field at all. Only `signed` fields may
/// carry a leading `-`.
fn field_value(s: &str, signed: bool) -> Option<Option<i32>> {
    if s.bytes().all(|b| b == b'.' || b == b' ') {
        return Some(None);
    }
    let digits = match s.strip_prefix('-') {
        Some(digits) if signed => digits,
        Some(_) => return None,
        None => s,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().map(Some)
}

fn field(name: &str, value: Option<i32>, width: usize, signed: bool) -> AprsResult<String> {
    match value {
        None => Ok(".".repeat(width)),
        Some(v) if v < 0 && !signed => {
            Err(AprsError::range(format!("{} {} is negative", name, v)))
        }
        Some(v) => {
            let s = format!("{:0width$}", v, width = width);
            if s.len() > width {
                return Err(AprsError::range(format!(
                    "{} {} does not fit in {} characters",
                    name, v, width
                )));
            }
            Ok(s)
        }
    }
}

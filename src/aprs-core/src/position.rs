// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Uncompressed latitude/longitude (`DDMM.hhN` / `DDDMM.hhE`) with
//! positional ambiguity.
//!
//! Ambiguity blanks trailing digits right to left, skipping the decimal
//! point: level 1 hides hundredths of a minute, level 4 hides all minutes.

use serde::Serialize;

use crate::error::{AprsError, AprsResult};

/// Highest number of digits that may be blanked.
pub const MAX_AMBIGUITY: u8 = 4;

/// Length of the `lat table lon code` block in a position report.
pub const LAT_LONG_BLOCK_LEN: usize = 19;

const LATITUDE_LEN: usize = 8;
const LONGITUDE_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> AprsResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AprsError::range(format!("latitude {}", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AprsError::range(format!("longitude {}", longitude)));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A point plus the APRS symbol drawn for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    coordinates: Coordinates,
    symbol_table: char,
    symbol_code: char,
    ambiguity: u8,
}

impl Position {
    pub fn new(
        coordinates: Coordinates,
        symbol_table: char,
        symbol_code: char,
        ambiguity: u8,
    ) -> AprsResult<Self> {
        if ambiguity > MAX_AMBIGUITY {
            return Err(AprsError::range(format!(
                "ambiguity {} above {}",
                ambiguity, MAX_AMBIGUITY
            )));
        }
        Ok(Self {
            coordinates,
            symbol_table,
            symbol_code,
            ambiguity,
        })
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }

    pub fn symbol_table(&self) -> char {
        self.symbol_table
    }

    pub fn symbol_code(&self) -> char {
        self.symbol_code
    }

    pub fn ambiguity(&self) -> u8 {
        self.ambiguity
    }

    /// Table `/` or `\` with code `_` marks a weather station.
    pub fn is_weather_symbol(&self) -> bool {
        matches!(self.symbol_table, '/' | '\\') && self.symbol_code == '_'
    }

    /// Decode the 19 character `DDMM.hhN T DDDMM.hhW C` block.
    pub fn decode_lat_long(block: &str) -> AprsResult<Self> {
        let field = |range: std::ops::Range<usize>| {
            block.get(range).ok_or_else(|| {
                AprsError::format(format!("position block {:?} is malformed", block))
            })
        };
        if block.len() != LAT_LONG_BLOCK_LEN {
            return Err(AprsError::format(format!(
                "position block must be {} bytes, got {}",
                LAT_LONG_BLOCK_LEN,
                block.len()
            )));
        }

        let (latitude, ambiguity) = decode_latitude(field(0..8)?)?;
        let symbol_table = single_char(field(8..9)?)?;
        let longitude = decode_longitude(field(9..18)?, ambiguity)?;
        let symbol_code = single_char(field(18..19)?)?;

        Position::new(
            Coordinates::new(latitude, longitude)?,
            symbol_table,
            symbol_code,
            ambiguity,
        )
    }

    pub fn encode_lat_long(&self) -> AprsResult<String> {
        let mut out = encode_latitude(self.latitude(), self.ambiguity)?;
        out.push(self.symbol_table);
        out.push_str(&encode_longitude(self.longitude(), self.ambiguity)?);
        out.push(self.symbol_code);
        Ok(out)
    }
}

/// Decode `DDMM.hhN`, returning signed degrees and the ambiguity found.
pub fn decode_latitude(s: &str) -> AprsResult<(f64, u8)> {
    let bytes = checked_layout(s, LATITUDE_LEN, b"NS")?;
    let ambiguity = count_ambiguity(bytes)?;
    if ambiguity > MAX_AMBIGUITY {
        return Err(AprsError::range(format!(
            "latitude {:?} blanks more than the minutes",
            s
        )));
    }
    let value = degrees_and_minutes(bytes, 2, 90.0)?;
    let sign = if bytes[7] == b'S' { -1.0 } else { 1.0 };
    Ok((round4(sign * value), ambiguity))
}

/// Decode `DDDMM.hhE`. The ambiguity already found in the latitude is
/// applied to the longitude first.
pub fn decode_longitude(s: &str, ambiguity: u8) -> AprsResult<f64> {
    checked_layout(s, LONGITUDE_LEN, b"EW")?;
    let enforced = enforce_ambiguity(s, ambiguity)?;
    let bytes = enforced.as_bytes();
    if count_ambiguity(bytes)? != ambiguity {
        return Err(AprsError::format(format!(
            "longitude {:?} does not match latitude ambiguity {}",
            s, ambiguity
        )));
    }
    let value = degrees_and_minutes(bytes, 3, 180.0)?;
    let sign = if bytes[8] == b'W' { -1.0 } else { 1.0 };
    Ok(round4(sign * value))
}

/// Blank `ambiguity` digits from the right of a latitude or longitude
/// string. The decimal point and the trailing direction letter are
/// never counted.
pub fn enforce_ambiguity(s: &str, ambiguity: u8) -> AprsResult<String> {
    if ambiguity > MAX_AMBIGUITY {
        return Err(AprsError::range(format!(
            "ambiguity {} above {}",
            ambiguity, MAX_AMBIGUITY
        )));
    }
    if !s.is_ascii() || s.len() < 2 {
        return Err(AprsError::format(format!("cannot apply ambiguity to {:?}", s)));
    }

    let mut bytes = s.as_bytes().to_vec();
    let mut remaining = ambiguity;
    for b in bytes[..s.len() - 1].iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        if *b == b'.' {
            continue;
        }
        *b = b' ';
        remaining -= 1;
    }
    if remaining > 0 {
        return Err(AprsError::range(format!(
            "{:?} has fewer than {} digits",
            s, ambiguity
        )));
    }
    String::from_utf8(bytes).map_err(|e| AprsError::format(e.to_string()))
}

pub fn encode_latitude(latitude: f64, ambiguity: u8) -> AprsResult<String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AprsError::range(format!("latitude {}", latitude)));
    }
    let (degrees, minutes, hundredths) = split_degrees(latitude);
    let hemisphere = if latitude < 0.0 { 'S' } else { 'N' };
    let s = format!("{:02}{:02}.{:02}{}", degrees, minutes, hundredths, hemisphere);
    enforce_ambiguity(&s, ambiguity)
}

pub fn encode_longitude(longitude: f64, ambiguity: u8) -> AprsResult<String> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AprsError::range(format!("longitude {}", longitude)));
    }
    let (degrees, minutes, hundredths) = split_degrees(longitude);
    let hemisphere = if longitude < 0.0 { 'W' } else { 'E' };
    let s = format!("{:03}{:02}.{:02}{}", degrees, minutes, hundredths, hemisphere);
    enforce_ambiguity(&s, ambiguity)
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Whole degrees, whole minutes and hundredths of a minute.
fn split_degrees(value: f64) -> (u32, u32, u32) {
    let total = (value.abs() * 6000.0).round() as u32;
    (total / 6000, (total % 6000) / 100, total % 100)
}

fn single_char(s: &str) -> AprsResult<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AprsError::format(format!("expected one character, got {:?}", s))),
    }
}

/// Check length, the decimal point and the direction letter.
fn checked_layout<'a>(s: &'a str, len: usize, directions: &[u8]) -> AprsResult<&'a [u8]> {
    let bytes = s.as_bytes();
    if bytes.len() != len || !s.is_ascii() {
        return Err(AprsError::format(format!(
            "{:?} must be {} ASCII characters",
            s, len
        )));
    }
    if bytes[len - 4] != b'.' {
        return Err(AprsError::format(format!(
            "{:?} has no decimal point at offset {}",
            s,
            len - 4
        )));
    }
    if !directions.contains(&bytes[len - 1]) {
        return Err(AprsError::format(format!(
            "{:?} has no direction letter",
            s
        )));
    }
    Ok(bytes)
}

/// Count trailing blanks, rejecting a blank left of a digit.
fn count_ambiguity(bytes: &[u8]) -> AprsResult<u8> {
    let mut blanks = 0u8;
    let mut seen_digit = false;
    for &b in bytes[..bytes.len() - 1].iter().rev() {
        match b {
            b'.' => {}
            b' ' if !seen_digit => blanks += 1,
            b' ' => {
                return Err(AprsError::format(
                    "blank found left of a digit in coordinate",
                ))
            }
            b'0'..=b'9' => seen_digit = true,
            other => {
                return Err(AprsError::format(format!(
                    "unexpected {:?} in coordinate",
                    other as char
                )))
            }
        }
    }
    Ok(blanks)
}

/// Parse `D..DMM.hh` (blanks read as zero) into decimal degrees.
fn degrees_and_minutes(bytes: &[u8], degree_digits: usize, max: f64) -> AprsResult<f64> {
    let digits: Vec<u8> = bytes[..bytes.len() - 1]
        .iter()
        .filter(|b| **b != b'.')
        .map(|b| if *b == b' ' { 0 } else { b - b'0' })
        .collect();
    let number = |range: std::ops::Range<usize>| {
        digits[range]
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(*d))
    };

    let degrees = f64::from(number(0..degree_digits));
    let hundredths_of_minutes = number(degree_digits..degree_digits + 4);
    if degrees > max {
        return Err(AprsError::range(format!("{} degrees above {}", degrees, max)));
    }
    if hundredths_of_minutes >= 6000 {
        return Err(AprsError::range(format!(
            "{} minutes is not below 60",
            f64::from(hundredths_of_minutes) / 100.0
        )));
    }
    let value = degrees + f64::from(hundredths_of_minutes) / 6000.0;
    if value > max {
        return Err(AprsError::range(format!("{} degrees above {}", value, max)));
    }
    Ok(value)
}

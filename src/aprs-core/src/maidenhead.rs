// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Maidenhead grid locators as APRS positions.
//!
//! Each character pair narrows the cell: field (A-R), square (0-9),
//! subsquare (A-X), extended square (0-9), extended subsquare (A-X).
//! The first character of a pair is longitude, the second latitude.

use crate::error::{AprsError, AprsResult};
use crate::position::{round4, Coordinates, Position};

/// Symbol assumed for a grid that carries none.
pub const DEFAULT_SYMBOL_TABLE: char = '\\';
pub const DEFAULT_SYMBOL_CODE: char = '.';

/// Grid length that maps to ambiguity 0.
const FULL_PRECISION_LEN: usize = 8;

struct Step {
    lon: f64,
    lat: f64,
    radix: u32,
    letter: bool,
}

const STEPS: [Step; 5] = [
    Step {
        lon: 20.0,
        lat: 10.0,
        radix: 18,
        letter: true,
    },
    Step {
        lon: 2.0,
        lat: 1.0,
        radix: 10,
        letter: false,
    },
    Step {
        lon: 2.0 / 24.0,
        lat: 1.0 / 24.0,
        radix: 24,
        letter: true,
    },
    Step {
        lon: 0.2 / 24.0,
        lat: 0.1 / 24.0,
        radix: 10,
        letter: false,
    },
    Step {
        lon: 0.2 / 576.0,
        lat: 0.1 / 576.0,
        radix: 24,
        letter: true,
    },
];

impl Position {
    /// Decode a 4, 6, 8 or 10 character locator, optionally followed by a
    /// symbol table and code, to the centre of its cell.
    pub fn decode_maidenhead(s: &str) -> AprsResult<Self> {
        if !s.is_ascii() {
            return Err(AprsError::format(format!("grid {:?} is not ASCII", s)));
        }
        let bytes = s.as_bytes();
        let (grid, symbol_table, symbol_code) = match bytes.len() {
            n if n >= 2 && !bytes[n - 2].is_ascii_alphanumeric() => (
                &bytes[..n - 2],
                char::from(bytes[n - 2]),
                char::from(bytes[n - 1]),
            ),
            _ => (bytes, DEFAULT_SYMBOL_TABLE, DEFAULT_SYMBOL_CODE),
        };
        if !matches!(grid.len(), 4 | 6 | 8 | 10) {
            return Err(AprsError::format(format!(
                "grid {:?} must be 4, 6, 8 or 10 characters",
                s
            )));
        }

        let mut longitude = -180.0;
        let mut latitude = -90.0;
        let mut last = &STEPS[0];
        for (pair, step) in grid.chunks(2).zip(STEPS.iter()) {
            longitude += f64::from(grid_index(pair[0], step)?) * step.lon;
            latitude += f64::from(grid_index(pair[1], step)?) * step.lat;
            last = step;
        }
        longitude += last.lon / 2.0;
        latitude += last.lat / 2.0;

        let ambiguity = FULL_PRECISION_LEN.saturating_sub(grid.len()) as u8;
        Position::new(
            Coordinates::new(round4(latitude), round4(longitude))?,
            symbol_table,
            symbol_code,
            ambiguity,
        )
    }

    /// Encode as a `length` character locator, shortened by the position's
    /// ambiguity, optionally followed by the symbol table and code.
    pub fn encode_gridsquare(&self, length: usize, append_symbol: bool) -> AprsResult<String> {
        if !matches!(length, 4 | 6 | 8) {
            return Err(AprsError::range(format!(
                "grid length {} is not 4, 6 or 8",
                length
            )));
        }
        let ambiguity = usize::from(self.ambiguity());
        if ambiguity > length - 4 {
            return Err(AprsError::range(format!(
                "ambiguity {} too large for a {} character grid",
                ambiguity, length
            )));
        }
        let effective = length - ambiguity;
        if effective % 2 != 0 {
            return Err(AprsError::range(format!(
                "ambiguity {} leaves an odd grid length",
                ambiguity
            )));
        }

        let mut longitude = self.longitude() + 180.0;
        let mut latitude = self.latitude() + 90.0;
        let mut out = String::with_capacity(effective + 2);
        for step in STEPS.iter().take(effective / 2) {
            let lon_index = quantize(longitude, step.lon, step.radix);
            let lat_index = quantize(latitude, step.lat, step.radix);
            longitude -= f64::from(lon_index) * step.lon;
            latitude -= f64::from(lat_index) * step.lat;
            out.push(grid_char(lon_index, step));
            out.push(grid_char(lat_index, step));
        }

        if append_symbol {
            out.push(self.symbol_table());
            out.push(self.symbol_code());
        }
        Ok(out)
    }
}

/// Check whether `s` is a bare 4 to 8 character locator.
pub fn is_gridsquare(s: &str) -> bool {
    let bytes = s.as_bytes();
    matches!(bytes.len(), 4 | 6 | 8)
        && bytes
            .chunks(2)
            .zip(STEPS.iter())
            .all(|(pair, step)| {
                grid_index(pair[0], step).is_ok() && grid_index(pair[1], step).is_ok()
            })
}

fn grid_index(c: u8, step: &Step) -> AprsResult<u32> {
    let index = if step.letter {
        c.to_ascii_uppercase().checked_sub(b'A')
    } else {
        c.checked_sub(b'0')
    };
    match index.map(u32::from) {
        Some(i) if i < step.radix => Ok(i),
        _ => Err(AprsError::format(format!(
            "{:?} is not a valid grid character here",
            char::from(c)
        ))),
    }
}

fn grid_char(index: u32, step: &Step) -> char {
    let base = if step.letter { b'A' } else { b'0' };
    char::from(base + index as u8)
}

fn quantize(value: f64, step: f64, radix: u32) -> u32 {
    (value / step).floor().clamp(0.0, f64::from(radix - 1)) as u32
}

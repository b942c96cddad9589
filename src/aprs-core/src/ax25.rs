// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! AX.25 UI frame envelope.
//!
//! ```text
//! 7E | dest(7) | src(7) | digi(7) x 0..8 | 03 F0 | info | FCS(2) | 7E
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{AprsError, AprsResult};

pub const FLAG: u8 = 0x7E;
const CONTROL_UI: u8 = 0x03;
const PID_NO_LAYER3: u8 = 0xF0;
const ADDRESS_LEN: usize = 7;
const MAX_DIGIPEATERS: usize = 8;
const FCS_LEN: usize = 2;

// ---------------------------------------------------------------------------
// CRC-16-CCITT
// ---------------------------------------------------------------------------

const CRC_CCITT_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0x8408;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

pub(crate) fn crc16ccitt(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &b in bytes {
        crc = (crc >> 8) ^ CRC_CCITT_TABLE[((crc ^ b as u16) & 0xFF) as usize];
    }
    crc ^ 0xFFFF
}

// ---------------------------------------------------------------------------
// Address field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ax25Address {
    call: String,
    ssid: u8,
    last: bool,
}

impl fmt::Display for Ax25Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid != 0 {
            write!(f, "{}-{}", self.call, self.ssid)
        } else {
            f.write_str(&self.call)
        }
    }
}

fn decode_address(slot: &[u8]) -> Ax25Address {
    let mut call = String::with_capacity(6);
    for &b in &slot[..6] {
        let ch = b >> 1;
        if ch > 32 {
            call.push(ch as char);
        }
    }
    Ax25Address {
        call: call.trim_end().to_string(),
        ssid: (slot[6] >> 1) & 0x0F,
        last: (slot[6] & 0x01) == 1,
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ax25Frame {
    pub(crate) destination: Ax25Address,
    pub(crate) source: Ax25Address,
    pub(crate) digipeaters: Vec<Ax25Address>,
    pub(crate) info: Vec<u8>,
}

/// True when `bytes` opens and closes with the frame delimiter.
pub(crate) fn is_framed(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == FLAG && bytes[bytes.len() - 1] == FLAG
}

/// Split a delimited UI frame into addresses and information field. A bad
/// frame check sequence is logged, not rejected.
pub(crate) fn parse_frame(frame: &[u8]) -> AprsResult<Ax25Frame> {
    if !is_framed(frame) {
        return Err(AprsError::format("frame is not delimited by 0x7E"));
    }
    let inner = &frame[1..frame.len() - 1];
    if inner.len() < 2 * ADDRESS_LEN + 2 + FCS_LEN {
        return Err(AprsError::format(format!(
            "frame of {} bytes is too short",
            frame.len()
        )));
    }

    let (body, fcs) = inner.split_at(inner.len() - FCS_LEN);
    let received = u16::from_le_bytes([fcs[0], fcs[1]]);
    let computed = crc16ccitt(body);
    if received != computed {
        debug!(
            received = format_args!("{:#06x}", received),
            computed = format_args!("{:#06x}", computed),
            "AX.25 frame check sequence mismatch"
        );
    }

    let destination = decode_address(&body[..ADDRESS_LEN]);
    let source = decode_address(&body[ADDRESS_LEN..2 * ADDRESS_LEN]);

    let mut offset = 2 * ADDRESS_LEN;
    let mut last = source.last;
    let mut digipeaters = Vec::new();
    while !last && !at_control_field(body, offset) {
        if digipeaters.len() == MAX_DIGIPEATERS {
            return Err(AprsError::format("more than 8 digipeaters in address field"));
        }
        let slot = body
            .get(offset..offset + ADDRESS_LEN)
            .ok_or_else(|| AprsError::format("address field truncated"))?;
        let digi = decode_address(slot);
        last = digi.last;
        digipeaters.push(digi);
        offset += ADDRESS_LEN;
    }

    if !at_control_field(body, offset) {
        return Err(AprsError::format("not an AX.25 UI frame"));
    }

    Ok(Ax25Frame {
        destination,
        source,
        digipeaters,
        info: body[offset + 2..].to_vec(),
    })
}

fn at_control_field(body: &[u8], offset: usize) -> bool {
    body.get(offset..offset + 2) == Some(&[CONTROL_UI, PID_NO_LAYER3][..])
}

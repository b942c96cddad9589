// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Reference instant used to fill in the date fields APRS timestamps omit.

use chrono::{DateTime, Duration, FixedOffset, Local, Offset, Utc};

/// Clock-drift tolerance applied when deciding whether an HMS or MDHM
/// timestamp lies in the future.
pub const DEFAULT_DRIFT_TOLERANCE_SECS: i64 = 5 * 60;

/// The "now" a packet is decoded against.
///
/// Decoding never reads the wall clock itself; callers pass one of these in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTime {
    now: DateTime<Utc>,
    local_offset: FixedOffset,
    drift_tolerance: Duration,
}

impl ReferenceTime {
    pub fn new(now: DateTime<Utc>, local_offset: FixedOffset) -> Self {
        Self {
            now,
            local_offset,
            drift_tolerance: Duration::seconds(DEFAULT_DRIFT_TOLERANCE_SECS),
        }
    }

    /// Reference instant whose local zone is UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, utc_offset())
    }

    /// Snapshot of the system clock and the host's current UTC offset.
    pub fn system() -> Self {
        let local = Local::now();
        Self::new(local.with_timezone(&Utc), *local.offset())
    }

    pub fn with_local_offset(mut self, local_offset: FixedOffset) -> Self {
        self.local_offset = local_offset;
        self
    }

    pub fn with_drift_tolerance(mut self, drift_tolerance: Duration) -> Self {
        self.drift_tolerance = drift_tolerance;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }

    pub fn drift_tolerance(&self) -> Duration {
        self.drift_tolerance
    }

    /// Latest instant still accepted as "not in the future".
    pub(crate) fn latest_accepted(&self) -> DateTime<Utc> {
        self.now + self.drift_tolerance
    }
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

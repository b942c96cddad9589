// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! APRS timestamp grammars.
//!
//! | grammar | layout     | zone  |
//! |---------|------------|-------|
//! | DHMz    | `DDHHMMz`  | UTC   |
//! | DHMl    | `DDHHMM/`  | local |
//! | HMS     | `HHMMSSh`  | UTC   |
//! | MDHM    | `MMDDHHMM` | UTC   |
//!
//! None of them carries a year and most carry no month, so decoding fills
//! the gaps in from a [`ReferenceTime`].

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc,
};
use serde::Serialize;

use crate::clock::{utc_offset, ReferenceTime};
use crate::error::{AprsError, AprsResult};

/// Longest backward walk needed to meet a given day of month
/// (the 31st seen from early March is 58 days back).
const MAX_DAY_SEARCH: u32 = 62;

/// Years tried for an MDHM stamp; covers a full leap-year cycle.
const MDHM_YEAR_ATTEMPTS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimestampType {
    /// Day, hour, minute in UTC (`DDHHMMz`).
    Dhmz,
    /// Day, hour, minute in local time (`DDHHMM/`).
    Dhml,
    /// Hour, minute, second in UTC (`HHMMSSh`).
    Hms,
    /// Month, day, hour, minute in UTC (`MMDDHHMM`).
    Mdhm,
    /// Built from a calendar instant rather than decoded.
    NotDecoded,
}

impl TimestampType {
    /// Number of characters the grammar occupies on the wire.
    pub fn encoded_len(self) -> Option<usize> {
        match self {
            TimestampType::Dhmz | TimestampType::Dhml | TimestampType::Hms => Some(7),
            TimestampType::Mdhm => Some(8),
            TimestampType::NotDecoded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    date_time: DateTime<FixedOffset>,
    decoded_type: TimestampType,
}

impl Timestamp {
    /// Wrap a calendar instant. The instant keeps its own offset, which is
    /// the zone the local (`DHMl`) grammar renders in.
    pub fn new<Tz: TimeZone>(date_time: DateTime<Tz>) -> Self {
        let offset = date_time.offset().fix();
        Self {
            date_time: date_time.with_timezone(&offset),
            decoded_type: TimestampType::NotDecoded,
        }
    }

    /// Decode a 7 or 8 character timestamp against `reference`.
    pub fn decode(s: &str, reference: &ReferenceTime) -> AprsResult<Self> {
        let bytes = s.as_bytes();
        if !s.is_ascii() || !(7..=8).contains(&bytes.len()) {
            return Err(AprsError::format(format!(
                "timestamp must be 7 or 8 ASCII characters, got {:?}",
                s
            )));
        }

        let first = two_digits(bytes, 0)?;
        let second = two_digits(bytes, 2)?;
        let third = two_digits(bytes, 4)?;

        match (bytes.len(), bytes[6]) {
            (7, b'z') => decode_dhm(
                first,
                second,
                third,
                utc_offset(),
                TimestampType::Dhmz,
                reference,
            ),
            (7, b'/') => decode_dhm(
                first,
                second,
                third,
                reference.local_offset(),
                TimestampType::Dhml,
                reference,
            ),
            (7, b'h') => decode_hms(first, second, third, reference),
            (8, _) => {
                let fourth = two_digits(bytes, 6)?;
                decode_mdhm(first, second, third, fourth, reference)
            }
            (_, indicator) => Err(AprsError::format(format!(
                "unknown timestamp indicator {:?} in {:?}",
                indicator as char, s
            ))),
        }
    }

    /// Render the instant in the requested grammar.
    pub fn encode(&self, timestamp_type: TimestampType) -> AprsResult<String> {
        let utc = self.date_time.with_timezone(&Utc);
        let encoded = match timestamp_type {
            TimestampType::Dhmz => utc.format("%d%H%Mz").to_string(),
            TimestampType::Dhml => self.date_time.format("%d%H%M/").to_string(),
            TimestampType::Hms => utc.format("%H%M%Sh").to_string(),
            TimestampType::Mdhm => utc.format("%m%d%H%M").to_string(),
            TimestampType::NotDecoded => {
                return Err(AprsError::not_supported(
                    "a timestamp cannot be encoded as NotDecoded",
                ))
            }
        };
        Ok(encoded)
    }

    pub fn date_time(&self) -> DateTime<FixedOffset> {
        self.date_time
    }

    pub fn decoded_type(&self) -> TimestampType {
        self.decoded_type
    }

    /// Grammar used when re-encoding: the decoded one, or DHMz for
    /// timestamps built from an instant.
    pub fn preferred_type(&self) -> TimestampType {
        match self.decoded_type {
            TimestampType::NotDecoded => TimestampType::Dhmz,
            other => other,
        }
    }
}

/// Find the most recent month (at or before `hint`) whose calendar
/// contains day-of-month `day`.
///
/// Walks backward one day at a time and never forward, so a day number
/// later than today's resolves to the previous month.
pub fn find_correct_year_and_month(day: u32, hint: NaiveDate) -> AprsResult<(i32, u32)> {
    check_range("day", day, 1, 31)?;

    let mut date = hint;
    for _ in 0..=MAX_DAY_SEARCH {
        if date.day() == day {
            return Ok((date.year(), date.month()));
        }
        date = date
            .pred_opt()
            .ok_or_else(|| AprsError::range("ran past the earliest representable date"))?;
    }
    Err(AprsError::range(format!(
        "no day {} within {} days before {}",
        day, MAX_DAY_SEARCH, hint
    )))
}

fn decode_dhm(
    day: u32,
    hour: u32,
    minute: u32,
    offset: FixedOffset,
    decoded_type: TimestampType,
    reference: &ReferenceTime,
) -> AprsResult<Timestamp> {
    check_range("hour", hour, 0, 23)?;
    check_range("minute", minute, 0, 59)?;

    let today = reference.now().with_timezone(&offset).date_naive();
    let (year, month) = find_correct_year_and_month(day, today)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| AprsError::range(format!("invalid date {}-{}-{}", year, month, day)))?;
    let date_time = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| AprsError::range(format!("ambiguous local time {}", naive)))?;

    Ok(Timestamp {
        date_time,
        decoded_type,
    })
}

fn decode_hms(
    hour: u32,
    minute: u32,
    second: u32,
    reference: &ReferenceTime,
) -> AprsResult<Timestamp> {
    check_range("hour", hour, 0, 23)?;
    check_range("minute", minute, 0, 59)?;
    check_range("second", second, 0, 59)?;

    let naive = reference
        .now()
        .date_naive()
        .and_hms_opt(hour, minute, second)
        .ok_or_else(|| AprsError::range("invalid time of day"))?;
    let mut date_time = Utc.from_utc_datetime(&naive);
    if date_time > reference.latest_accepted() {
        date_time = date_time - Duration::days(1);
    }

    Ok(Timestamp {
        date_time: date_time.with_timezone(&utc_offset()),
        decoded_type: TimestampType::Hms,
    })
}

fn decode_mdhm(
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    reference: &ReferenceTime,
) -> AprsResult<Timestamp> {
    check_range("month", month, 1, 12)?;
    check_range("day", day, 1, 31)?;
    check_range("hour", hour, 0, 23)?;
    check_range("minute", minute, 0, 59)?;

    let latest = reference.latest_accepted();
    for attempt in 0..MDHM_YEAR_ATTEMPTS {
        let year = reference.now().year() - attempt;
        let Some(naive) = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
        else {
            continue;
        };
        let candidate = Utc.from_utc_datetime(&naive);
        if candidate <= latest {
            return Ok(Timestamp {
                date_time: candidate.with_timezone(&utc_offset()),
                decoded_type: TimestampType::Mdhm,
            });
        }
    }

    Err(AprsError::range(format!(
        "no valid past date for month {} day {}",
        month, day
    )))
}

fn two_digits(bytes: &[u8], at: usize) -> AprsResult<u32> {
    match (bytes.get(at), bytes.get(at + 1)) {
        (Some(&hi), Some(&lo)) if hi.is_ascii_digit() && lo.is_ascii_digit() => {
            Ok(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        }
        _ => Err(AprsError::format(format!(
            "expected two digits at offset {} of timestamp",
            at
        ))),
    }
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> AprsResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AprsError::range(format!(
            "{} {} outside {}..={}",
            name, value, min, max
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn reference(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> ReferenceTime {
        ReferenceTime::utc(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_and_month_previous_month() {
        assert_eq!(
            find_correct_year_and_month(25, date(2016, 10, 24)),
            Ok((2016, 9))
        );
    }

    #[test]
    fn test_year_and_month_same_month() {
        assert_eq!(
            find_correct_year_and_month(7, date(2016, 10, 24)),
            Ok((2016, 10))
        );
        assert_eq!(
            find_correct_year_and_month(24, date(2016, 10, 24)),
            Ok((2016, 10))
        );
    }

    #[test]
    fn test_year_and_month_previous_year() {
        assert_eq!(
            find_correct_year_and_month(31, date(2016, 1, 1)),
            Ok((2015, 12))
        );
    }

    #[test]
    fn test_year_and_month_skips_short_months() {
        // No 31st in February or April.
        assert_eq!(
            find_correct_year_and_month(31, date(2016, 3, 15)),
            Ok((2016, 1))
        );
        assert_eq!(
            find_correct_year_and_month(31, date(2016, 5, 30)),
            Ok((2016, 3))
        );
    }

    #[test]
    fn test_year_and_month_rejects_impossible_days() {
        assert!(matches!(
            find_correct_year_and_month(0, date(2016, 1, 1)),
            Err(AprsError::Range(_))
        ));
        assert!(matches!(
            find_correct_year_and_month(32, date(2016, 1, 1)),
            Err(AprsError::Range(_))
        ));
    }

    #[test]
    fn test_decode_dhm_zulu() {
        let ts = Timestamp::decode("092345z", &reference(2016, 10, 24, 12, 0)).unwrap();
        assert_eq!(ts.decoded_type(), TimestampType::Dhmz);
        let dt = ts.date_time();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2016, 10, 9));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (23, 45, 0));
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_decode_dhm_day_after_today_is_last_month() {
        let ts = Timestamp::decode("251200z", &reference(2016, 10, 24, 12, 0)).unwrap();
        assert_eq!(ts.date_time().month(), 9);
        assert_eq!(ts.date_time().day(), 25);
    }

    #[test]
    fn test_decode_dhm_local_uses_reference_zone() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        // 23:30Z on the 24th is already the 25th at +02:00.
        let reference = reference(2016, 10, 24, 23, 30).with_local_offset(offset);
        let ts = Timestamp::decode("251000/", &reference).unwrap();
        assert_eq!(ts.decoded_type(), TimestampType::Dhml);
        let dt = ts.date_time();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!((dt.month(), dt.day(), dt.hour()), (10, 25, 10));
        assert_eq!(ts.encode(TimestampType::Dhml).unwrap(), "251000/");
        assert_eq!(ts.encode(TimestampType::Dhmz).unwrap(), "250800z");
    }

    #[test]
    fn test_decode_hms_within_drift_tolerance_is_today() {
        let ts = Timestamp::decode("120400h", &reference(2016, 10, 24, 12, 0)).unwrap();
        assert_eq!(ts.decoded_type(), TimestampType::Hms);
        assert_eq!(ts.date_time().day(), 24);
    }

    #[test]
    fn test_decode_hms_too_far_ahead_is_yesterday() {
        let ts = Timestamp::decode("120600h", &reference(2016, 10, 24, 12, 0)).unwrap();
        let dt = ts.date_time();
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (23, 12, 6));
    }

    #[test]
    fn test_decode_hms_respects_custom_tolerance() {
        let reference = reference(2016, 10, 24, 12, 0).with_drift_tolerance(Duration::minutes(10));
        let ts = Timestamp::decode("120600h", &reference).unwrap();
        assert_eq!(ts.date_time().day(), 24);
    }

    #[test]
    fn test_decode_mdhm_leap_day_walks_back_to_leap_year() {
        let ts = Timestamp::decode("02291200", &reference(2017, 3, 1, 0, 0)).unwrap();
        assert_eq!(ts.decoded_type(), TimestampType::Mdhm);
        let dt = ts.date_time();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2016, 2, 29));
    }

    #[test]
    fn test_decode_mdhm_future_this_year_is_last_year() {
        let ts = Timestamp::decode("10241230", &reference(2016, 10, 24, 12, 0)).unwrap();
        assert_eq!(ts.date_time().year(), 2015);

        let ts = Timestamp::decode("10241204", &reference(2016, 10, 24, 12, 0)).unwrap();
        assert_eq!(ts.date_time().year(), 2016);
    }

    #[test]
    fn test_decode_rejects_bad_grammar() {
        let reference = reference(2016, 10, 24, 12, 0);
        for input in ["092345x", "09234z", "0923a5z", "1024123", "092345zz", "", "０92345z"] {
            assert!(
                matches!(Timestamp::decode(input, &reference), Err(AprsError::Format(_))),
                "expected format error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range_fields() {
        let reference = reference(2016, 10, 24, 12, 0);
        for input in [
            "322345z", "002345z", "092460z", "092445z9", "246000h", "13011200", "02301200",
        ] {
            assert!(
                Timestamp::decode(input, &reference).is_err(),
                "expected failure for {:?}",
                input
            );
        }
        assert!(matches!(
            Timestamp::decode("092460z", &reference),
            Err(AprsError::Range(_))
        ));
        assert!(matches!(
            Timestamp::decode("13011200", &reference),
            Err(AprsError::Range(_))
        ));
        assert!(matches!(
            Timestamp::decode("02301200", &reference),
            Err(AprsError::Range(_))
        ));
    }

    #[test]
    fn test_encode_every_grammar_from_an_instant() {
        let ts = Timestamp::new(Utc.with_ymd_and_hms(2016, 10, 9, 23, 45, 17).unwrap());
        assert_eq!(ts.decoded_type(), TimestampType::NotDecoded);
        assert_eq!(ts.preferred_type(), TimestampType::Dhmz);
        assert_eq!(ts.encode(TimestampType::Dhmz).unwrap(), "092345z");
        assert_eq!(ts.encode(TimestampType::Dhml).unwrap(), "092345/");
        assert_eq!(ts.encode(TimestampType::Hms).unwrap(), "234517h");
        assert_eq!(ts.encode(TimestampType::Mdhm).unwrap(), "10092345");
        assert!(matches!(
            ts.encode(TimestampType::NotDecoded),
            Err(AprsError::NotSupported(_))
        ));
    }

    #[test]
    fn test_zulu_grammars_convert_local_instants_to_utc() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = Timestamp::new(offset.with_ymd_and_hms(2016, 10, 9, 22, 0, 0).unwrap());
        assert_eq!(ts.encode(TimestampType::Dhml).unwrap(), "092200/");
        assert_eq!(ts.encode(TimestampType::Dhmz).unwrap(), "100300z");
    }

    #[test]
    fn test_decode_then_encode_reproduces_input() {
        let reference = reference(2016, 10, 24, 12, 0);
        for input in ["092345z", "241159z", "235959h", "10091200"] {
            let ts = Timestamp::decode(input, &reference).unwrap();
            assert_eq!(ts.encode(ts.preferred_type()).unwrap(), input);
        }
    }
}

//! Decoding of `DTSTART`/`DTEND` values.

use chrono::{DateTime, NaiveDate, Utc};

/// Decode an iCal timestamp value into a UTC instant.
///
/// Accepted forms:
/// - `20250115` (all-day, UTC midnight)
/// - `20250115T120000Z` (UTC date-time; unparseable time fields count as 0)
///
/// Floating and TZID-qualified date-times are not supported and return `None`.
pub fn decode_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let date = decode_date(value.get(..8)?)?;

    if value.len() == 8 {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    let time = value.get(8..)?.strip_prefix('T')?.strip_suffix('Z')?;
    if time.len() != 6 {
        return None;
    }
    let hour = time_field(time, 0);
    let minute = time_field(time, 2);
    let second = time_field(time, 4);

    Some(date.and_hms_opt(hour, minute, second)?.and_utc())
}

fn decode_date(digits: &str) -> Option<NaiveDate> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Two-digit field at `offset`, or 0 when not numeric.
fn time_field(time: &str, offset: usize) -> u32 {
    time.get(offset..offset + 2)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

//! Forward-only scan of an iCal document for booked intervals.

use chrono::{DateTime, Utc};

use super::timestamp::decode_timestamp;
use crate::busy::BusyInterval;

/// Start/end accumulated while inside a `VEVENT` block.
#[derive(Default)]
struct PendingEvent {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl PendingEvent {
    fn finish(self) -> Option<BusyInterval> {
        Some(BusyInterval::new(self.start?, self.end?))
    }
}

/// Split a content line into its property name and value.
///
/// `DTSTART;VALUE=DATE:20250115` → `("DTSTART", "20250115")`. Parameters are
/// dropped; the value is everything after the first colon. Folded
/// continuation lines (leading space or tab) are not properties.
fn split_line(line: &str) -> Option<(&str, &str)> {
    if line.starts_with([' ', '\t']) {
        return None;
    }
    let (head, value) = line.split_once(':')?;
    let name = head.split(';').next().unwrap_or(head);
    Some((name, value.trim()))
}

/// Scan an iCal document and return the `[start, end)` interval of every
/// complete `VEVENT`, in document order.
///
/// Events missing `DTSTART` or `DTEND`, or whose values can't be decoded,
/// are skipped. A document without events yields an empty list.
pub fn parse_busy_intervals(content: &str) -> Vec<BusyInterval> {
    let mut intervals = Vec::new();
    let mut pending: Option<PendingEvent> = None;

    for line in content.lines() {
        let Some((name, value)) = split_line(line) else {
            continue;
        };

        if name.eq_ignore_ascii_case("BEGIN") && value.eq_ignore_ascii_case("VEVENT") {
            pending = Some(PendingEvent::default());
            continue;
        }

        let Some(event) = pending.as_mut() else {
            continue;
        };

        if name.eq_ignore_ascii_case("DTSTART") {
            event.start = decode_timestamp(value);
        } else if name.eq_ignore_ascii_case("DTEND") {
            event.end = decode_timestamp(value);
        } else if name.eq_ignore_ascii_case("END") && value.eq_ignore_ascii_case("VEVENT") {
            if let Some(interval) = pending.take().and_then(PendingEvent::finish) {
                intervals.push(interval);
            }
        }
    }

    intervals
}

//! Busy intervals and the set of busy UTC days derived from them.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::ics::parse_busy_intervals;

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A booked period, half-open `[start, end)`, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        BusyInterval { start, end }
    }

    /// UTC days touched by this interval.
    ///
    /// Steps from `start` one day at a time while the step is still before
    /// `end`, so the day containing `end` is excluded for whole-day bookings
    /// (checkout day stays free). Empty when `end <= start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        std::iter::successors(Some(self.start), |t| t.checked_add_signed(Duration::days(1)))
            .take_while(|t| *t < self.end)
            .map(|t| t.date_naive())
    }
}

/// Set of busy UTC calendar days for one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyDateSet {
    days: BTreeSet<NaiveDate>,
}

impl BusyDateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_intervals<'a>(intervals: impl IntoIterator<Item = &'a BusyInterval>) -> Self {
        let days = intervals.into_iter().flat_map(BusyInterval::days).collect();
        BusyDateSet { days }
    }

    /// Parse a feed document and expand all its bookings.
    pub fn from_document(content: &str) -> Self {
        Self::from_intervals(&parse_busy_intervals(content))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Lookup by `YYYY-MM-DD` key. Malformed keys are never busy.
    pub fn contains_key(&self, key: &str) -> bool {
        NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Busy days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }

    pub fn day_keys(&self) -> Vec<String> {
        self.iter().map(day_key).collect()
    }
}

impl FromIterator<NaiveDate> for BusyDateSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        BusyDateSet {
            days: iter.into_iter().collect(),
        }
    }
}

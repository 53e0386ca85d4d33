//! The month shown by a calendar widget.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::constants::GRID_CELLS;

/// A displayed month, anchored on its first day.
///
/// Only months whose whole 42-day grid window lies inside chrono's date
/// range can be represented. Stepping toward a month outside that range
/// leaves the cursor where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct MonthCursor {
    first: NaiveDate,
    grid_start: NaiveDate,
}

/// Monday on or before `first`, if the grid window starting there fits.
fn grid_window_start(first: NaiveDate) -> Option<NaiveDate> {
    let lead = u64::from(first.weekday().num_days_from_monday());
    let start = first.checked_sub_days(Days::new(lead))?;
    start.checked_add_days(Days::new(GRID_CELLS as u64 - 1))?;
    Some(start)
}

impl MonthCursor {
    fn anchored(first: NaiveDate) -> Option<Self> {
        grid_window_start(first).map(|grid_start| MonthCursor { first, grid_start })
    }

    /// Cursor for the month containing `date`.
    ///
    /// Dates in the few months at either edge of chrono's range clamp to the
    /// nearest month whose grid fits.
    pub fn containing(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        Self::anchored(first).unwrap_or_else(|| Self::nearest_to_edge(first))
    }

    fn nearest_to_edge(first: NaiveDate) -> Self {
        let step = Months::new(1);
        let toward_middle = |d: &NaiveDate| {
            if d.year() > 0 {
                d.checked_sub_months(step)
            } else {
                d.checked_add_months(step)
            }
        };
        std::iter::successors(Some(first), toward_middle)
            .find_map(Self::anchored)
            .expect("chrono's range spans many grid windows")
    }

    /// Cursor for `year`-`month`, or `None` when the date is invalid or its
    /// grid would fall outside chrono's range.
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).and_then(Self::anchored)
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let invalid = || format!("Invalid month '{}'. Expected YYYY-MM", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::from_ym(year, month).ok_or_else(invalid)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Monday on or before the first of the month; the first grid cell.
    pub fn grid_start(&self) -> NaiveDate {
        self.grid_start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    /// Move by `months` (negative goes back).
    pub fn shift(self, months: i32) -> Self {
        let step = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.first.checked_add_months(step)
        } else {
            self.first.checked_sub_months(step)
        };
        moved.and_then(Self::anchored).unwrap_or(self)
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl From<MonthCursor> for String {
    fn from(cursor: MonthCursor) -> Self {
        cursor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_containing_anchors_on_first_day() {
        let cursor = MonthCursor::containing(date(2025, 1, 31));
        assert_eq!(cursor.first_day(), date(2025, 1, 1));
    }

    #[test]
    fn test_navigation_does_not_drift() {
        // Starting from the 31st must not skip February
        let cursor = MonthCursor::containing(date(2025, 1, 31));

        let next = cursor.next();
        assert_eq!((next.year(), next.month()), (2025, 2));
        assert_eq!(next.next().month(), 3);
    }

    #[test]
    fn test_navigation_across_year_boundaries() {
        let december = MonthCursor::from_ym(2024, 12).unwrap();
        assert_eq!(december.next(), MonthCursor::from_ym(2025, 1).unwrap());

        let january = MonthCursor::from_ym(2025, 1).unwrap();
        assert_eq!(january.previous(), december);
        assert_eq!(january.shift(-25), MonthCursor::from_ym(2022, 12).unwrap());
        assert_eq!(january.shift(0), january);
    }

    #[test]
    fn test_navigation_stops_before_last_month_of_chrono_range() {
        let last = MonthCursor::containing(NaiveDate::MAX);
        assert_eq!(last.next(), last);
        assert_eq!(last.shift(12), last);
        assert!(last.first_day() < NaiveDate::MAX.with_day(1).unwrap());
        assert_eq!(last.previous().next(), last);

        let end = last.grid_start().checked_add_days(Days::new(41));
        assert!(end.is_some());
        assert!(MonthCursor::from_ym(NaiveDate::MAX.year(), NaiveDate::MAX.month()).is_none());
    }

    #[test]
    fn test_navigation_stops_at_first_month_of_chrono_range() {
        let first = MonthCursor::containing(NaiveDate::MIN);
        assert_eq!(first.previous(), first);
        assert_eq!(first.shift(-12), first);
        assert_eq!(first.next().previous(), first);
        assert!(first.grid_start() >= NaiveDate::MIN);
        assert_eq!(first.grid_start().weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn test_grid_start_is_monday_on_or_before_first() {
        // January 2025 starts on a Wednesday
        let cursor = MonthCursor::from_ym(2025, 1).unwrap();
        assert_eq!(cursor.grid_start(), date(2024, 12, 30));

        // September 2025 starts on a Monday
        let cursor = MonthCursor::from_ym(2025, 9).unwrap();
        assert_eq!(cursor.grid_start(), date(2025, 9, 1));
    }

    #[test]
    fn test_parse_and_display() {
        let cursor = MonthCursor::parse("2025-03").unwrap();
        assert_eq!(cursor.to_string(), "2025-03");
        assert!(cursor.contains(date(2025, 3, 31)));
        assert!(!cursor.contains(date(2024, 3, 1)));

        assert!(MonthCursor::parse("2025-13").is_err());
        assert!(MonthCursor::parse("march").is_err());
    }
}

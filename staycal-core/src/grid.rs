//! Six-week month grid.

use chrono::NaiveDate;
use serde::Serialize;

use crate::busy::{BusyDateSet, day_key};
use crate::constants::{DAYS_PER_WEEK, GRID_CELLS};
use crate::month::MonthCursor;

/// One day of the grid with its display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_other_month: bool,
    pub is_past: bool,
    pub is_busy: bool,
}

impl DayCell {
    pub fn day_key(&self) -> String {
        day_key(self.date)
    }
}

/// The 42 days shown for a month, starting on the Monday on or before the
/// first of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: MonthCursor,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Rows of seven cells, Monday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Busy days belonging to the displayed month.
    pub fn busy_days_in_month(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| !c.is_other_month && c.is_busy)
            .count()
    }
}

/// Build the grid for `month`, marking days from `busy` and days before `today`.
pub fn build_month_grid(month: MonthCursor, busy: &BusyDateSet, today: NaiveDate) -> MonthGrid {
    let cells = month
        .grid_start()
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| DayCell {
            date,
            is_other_month: !month.contains(date),
            is_past: date < today,
            is_busy: busy.contains(date),
        })
        .collect();

    MonthGrid { month, cells }
}

//! Core types for staycal.
//!
//! This crate turns a listing's iCal feed into an availability calendar:
//! - `feed` retrieves the document, retrying once through the proxy relay
//! - `ics` scans the document for booked intervals
//! - `busy` expands intervals into busy UTC days
//! - `month` and `grid` build the 42-cell month view
//! - `availability` holds per-listing widget state and discards stale fetches

pub mod availability;
pub mod busy;
pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod grid;
pub mod ics;
pub mod month;

pub use availability::{Applied, AvailabilityCalendar, FetchCompletion, FetchTicket};
pub use busy::{BusyDateSet, BusyInterval, day_key};
pub use crate::config::{Listing, StaycalConfig};
pub use error::{CalendarError, CalendarResult, FetchFailure};
pub use feed::{FeedDocument, FeedRetriever, FeedSource};
pub use grid::{DayCell, MonthGrid, build_month_grid};
pub use month::MonthCursor;

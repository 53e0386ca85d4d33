//! Minimal iCal scanning.
//!
//! Only the pieces an availability calendar needs: `VEVENT` blocks and their
//! `DTSTART`/`DTEND` values. Everything else in the document is skipped.

mod parse;
mod timestamp;

pub use parse::parse_busy_intervals;
pub use timestamp::decode_timestamp;

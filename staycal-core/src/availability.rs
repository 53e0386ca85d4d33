//! Per-listing availability widget state.
//!
//! Each listing owns one `AvailabilityCalendar`. Fetches are described by a
//! `FetchTicket` carrying the generation that was current when the fetch
//! started; mounting, unmounting and changing the feed URL all bump the
//! generation, so a completion whose ticket is behind is dropped instead of
//! overwriting newer state.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::busy::BusyDateSet;
use crate::constants::UNAVAILABLE_MESSAGE;
use crate::error::CalendarResult;
use crate::feed::{FeedDocument, FeedRetriever};
use crate::grid::{MonthGrid, build_month_grid};
use crate::month::MonthCursor;

/// A fetch sequence to run for a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    feed_url: String,
}

impl FetchTicket {
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the fetch (direct, then proxy on failure).
    pub async fn resolve(self, retriever: &FeedRetriever) -> FetchCompletion {
        let outcome = retriever.retrieve(&self.feed_url).await;
        FetchCompletion {
            ticket: self,
            outcome,
        }
    }
}

/// A finished fetch, waiting to be applied to its widget.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub outcome: CalendarResult<FeedDocument>,
}

/// What `AvailabilityCalendar::apply` did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Busy set replaced from the fetched document.
    Updated { busy_days: usize },
    /// Both attempts failed; error set, busy set kept.
    Unavailable,
    /// Superseded by a newer fetch, or the widget was unmounted.
    Stale,
}

#[derive(Debug, Clone)]
pub struct AvailabilityCalendar {
    feed_url: Option<String>,
    cursor: MonthCursor,
    busy: BusyDateSet,
    error: Option<String>,
    generation: u64,
    pending: Option<u64>,
}

impl AvailabilityCalendar {
    /// New widget showing the month of `today`, with no known bookings.
    pub fn new(feed_url: Option<String>, today: NaiveDate) -> Self {
        AvailabilityCalendar {
            feed_url: feed_url.filter(|u| !u.trim().is_empty()),
            cursor: MonthCursor::containing(today),
            busy: BusyDateSet::new(),
            error: None,
            generation: 0,
            pending: None,
        }
    }

    /// Start a fetch of the current feed. Supersedes any fetch in flight.
    ///
    /// Returns `None` when the listing has no feed.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        self.generation += 1;
        self.pending = None;
        self.error = None;

        let feed_url = self.feed_url.clone()?;
        self.pending = Some(self.generation);
        Some(FetchTicket {
            generation: self.generation,
            feed_url,
        })
    }

    /// Mark every fetch in flight as stale.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Point the widget at another feed. Bookings and errors from the old
    /// feed are cleared and a fetch of the new one starts.
    pub fn set_feed_url(&mut self, feed_url: Option<String>) -> Option<FetchTicket> {
        let feed_url = feed_url.filter(|u| !u.trim().is_empty());
        if feed_url == self.feed_url {
            return None;
        }

        self.feed_url = feed_url;
        self.busy = BusyDateSet::new();
        self.mount()
    }

    /// Apply a finished fetch if it is still current.
    pub fn apply(&mut self, completion: FetchCompletion) -> Applied {
        let FetchCompletion { ticket, outcome } = completion;

        if ticket.generation != self.generation {
            debug!(
                url = %ticket.feed_url,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale feed result"
            );
            return Applied::Stale;
        }

        self.pending = None;
        match outcome {
            Ok(doc) => {
                self.busy = BusyDateSet::from_document(&doc.text);
                self.error = None;
                info!(
                    url = %ticket.feed_url,
                    source = ?doc.source,
                    busy_days = self.busy.len(),
                    "calendar updated"
                );
                Applied::Updated {
                    busy_days: self.busy.len(),
                }
            }
            Err(e) => {
                warn!("calendar unavailable: {e}");
                self.error = Some(UNAVAILABLE_MESSAGE.to_string());
                Applied::Unavailable
            }
        }
    }

    pub fn show_previous_month(&mut self) {
        self.cursor = self.cursor.previous();
    }

    pub fn show_next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    pub fn show_month(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }

    /// Grid for the displayed month from whatever bookings are currently known.
    pub fn grid(&self, today: NaiveDate) -> MonthGrid {
        build_month_grid(self.cursor, &self.busy, today)
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn busy_dates(&self) -> &BusyDateSet {
        &self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn feed_url(&self) -> Option<&str> {
        self.feed_url.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending == Some(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalendarError, FetchFailure};
    use crate::feed::FeedSource;
    use indoc::indoc;

    const FEED_A: &str = indoc! {"
        BEGIN:VEVENT
        DTSTART;VALUE=DATE:20250115
        DTEND;VALUE=DATE:20250118
        END:VEVENT
    "};

    const FEED_B: &str = indoc! {"
        BEGIN:VEVENT
        DTSTART;VALUE=DATE:20250120
        DTEND;VALUE=DATE:20250121
        END:VEVENT
    "};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn success(ticket: FetchTicket, text: &str) -> FetchCompletion {
        FetchCompletion {
            ticket,
            outcome: Ok(FeedDocument {
                text: text.to_string(),
                source: FeedSource::Direct,
            }),
        }
    }

    fn failure(ticket: FetchTicket) -> FetchCompletion {
        let url = ticket.feed_url.clone();
        FetchCompletion {
            ticket,
            outcome: Err(CalendarError::Proxy {
                url,
                source: FetchFailure::Status(reqwest::StatusCode::BAD_GATEWAY),
            }),
        }
    }

    fn widget(url: &str) -> AvailabilityCalendar {
        AvailabilityCalendar::new(Some(url.to_string()), today())
    }

    #[test]
    fn test_starts_empty_on_todays_month() {
        let cal = widget("https://a.example/a.ics");

        assert!(cal.busy_dates().is_empty());
        assert_eq!(cal.error(), None);
        assert_eq!(cal.cursor(), MonthCursor::from_ym(2025, 1).unwrap());
        assert!(!cal.is_loading());
    }

    #[test]
    fn test_successful_fetch_replaces_busy_set() {
        let mut cal = widget("https://a.example/a.ics");
        let ticket = cal.mount().unwrap();
        assert!(cal.is_loading());

        let applied = cal.apply(success(ticket, FEED_A));

        assert_eq!(applied, Applied::Updated { busy_days: 3 });
        assert!(!cal.is_loading());
        let grid = cal.grid(today());
        let busy: Vec<_> = grid.cells.iter().filter(|c| c.is_busy).map(|c| c.day_key()).collect();
        assert_eq!(busy, vec!["2025-01-15", "2025-01-16", "2025-01-17"]);
    }

    #[test]
    fn test_refetch_rebuilds_from_scratch() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();
        cal.apply(success(first, FEED_A));

        let second = cal.mount().unwrap();
        cal.apply(success(second, FEED_B));

        assert_eq!(cal.busy_dates().day_keys(), vec!["2025-01-20"]);
    }

    #[test]
    fn test_failure_keeps_busy_set_and_sets_error() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();
        cal.apply(success(first, FEED_A));
        let before = cal.busy_dates().clone();

        let second = cal.mount().unwrap();
        let applied = cal.apply(failure(second));

        assert_eq!(applied, Applied::Unavailable);
        assert_eq!(cal.busy_dates(), &before);
        assert_eq!(cal.error(), Some(UNAVAILABLE_MESSAGE));
    }

    #[test]
    fn test_failure_before_any_success_leaves_calendar_free() {
        let mut cal = widget("https://a.example/a.ics");
        let ticket = cal.mount().unwrap();

        cal.apply(failure(ticket));

        assert!(cal.busy_dates().is_empty());
        assert!(cal.grid(today()).cells.iter().all(|c| !c.is_busy));
        assert!(cal.error().is_some());
    }

    #[test]
    fn test_new_fetch_clears_previous_error() {
        let mut cal = widget("https://a.example/a.ics");
        let ticket = cal.mount().unwrap();
        cal.apply(failure(ticket));

        cal.mount();

        assert_eq!(cal.error(), None);
    }

    #[test]
    fn test_feed_change_discards_first_result() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();

        let second = cal
            .set_feed_url(Some("https://b.example/b.ics".to_string()))
            .unwrap();
        assert_eq!(second.feed_url(), "https://b.example/b.ics");

        // The new feed answers first; the old one straggles in afterwards
        assert_eq!(cal.apply(success(second, FEED_B)), Applied::Updated { busy_days: 1 });
        assert_eq!(cal.apply(success(first, FEED_A)), Applied::Stale);

        assert_eq!(cal.busy_dates().day_keys(), vec!["2025-01-20"]);
    }

    #[test]
    fn test_stale_failure_is_not_reported() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();
        let _second = cal.set_feed_url(Some("https://b.example/b.ics".to_string()));

        assert_eq!(cal.apply(failure(first)), Applied::Stale);
        assert_eq!(cal.error(), None);
        assert!(cal.is_loading());
    }

    #[test]
    fn test_feed_change_clears_old_bookings() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();
        cal.apply(success(first, FEED_A));

        cal.set_feed_url(Some("https://b.example/b.ics".to_string()));

        assert!(cal.busy_dates().is_empty());
    }

    #[test]
    fn test_same_feed_url_is_a_no_op() {
        let mut cal = widget("https://a.example/a.ics");
        let first = cal.mount().unwrap();

        assert!(cal.set_feed_url(Some("https://a.example/a.ics".to_string())).is_none());
        assert_eq!(cal.apply(success(first, FEED_A)), Applied::Updated { busy_days: 3 });
    }

    #[test]
    fn test_unmount_discards_in_flight_result() {
        let mut cal = widget("https://a.example/a.ics");
        let ticket = cal.mount().unwrap();

        cal.unmount();

        assert_eq!(cal.apply(success(ticket, FEED_A)), Applied::Stale);
        assert!(cal.busy_dates().is_empty());
        assert!(!cal.is_loading());
    }

    #[test]
    fn test_listing_without_feed_never_fetches() {
        let mut cal = AvailabilityCalendar::new(Some("  ".to_string()), today());

        assert!(cal.mount().is_none());
        assert!(!cal.is_loading());
        assert_eq!(cal.grid(today()).cells.len(), 42);
    }

    #[test]
    fn test_navigation_keeps_bookings_and_pending_fetch() {
        let mut cal = widget("https://a.example/a.ics");
        let ticket = cal.mount().unwrap();

        cal.show_next_month();
        cal.show_next_month();
        cal.show_previous_month();
        assert_eq!(cal.cursor(), MonthCursor::from_ym(2025, 2).unwrap());
        assert!(cal.is_loading());

        // Navigation doesn't invalidate the fetch in flight
        assert_eq!(cal.apply(success(ticket, FEED_A)), Applied::Updated { busy_days: 3 });

        cal.show_previous_month();
        assert_eq!(cal.grid(today()).busy_days_in_month(), 3);
    }
}

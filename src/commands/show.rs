use anyhow::{Context, Result};
use serde::Serialize;
use staycal_core::{AvailabilityCalendar, FeedRetriever, MonthCursor, MonthGrid, StaycalConfig};
use tokio::task::JoinSet;
use tracing::debug;

use super::{select_listings, today};
use crate::render::render_calendar;
use crate::utils::tui::{fetch_spinner, set_remaining};

/// JSON render model for one listing.
#[derive(Serialize)]
struct CalendarView<'a> {
    id: &'a str,
    title: &'a str,
    error: Option<&'a str>,
    grid: MonthGrid,
}

pub async fn run(
    config: &StaycalConfig,
    listing_id: Option<&str>,
    month: Option<MonthCursor>,
    json: bool,
) -> Result<()> {
    let listings = select_listings(config, listing_id)?;
    let retriever = FeedRetriever::new(config.proxy_endpoint()?);
    debug!(proxy = %retriever.proxy_endpoint(), listings = listings.len(), "loading calendars");
    let today = today();

    let mut calendars: Vec<AvailabilityCalendar> = listings
        .iter()
        .map(|listing| AvailabilityCalendar::new(listing.ical_url.clone(), today))
        .collect();

    let mut fetches = JoinSet::new();
    for (index, calendar) in calendars.iter_mut().enumerate() {
        if let Some(month) = month {
            calendar.show_month(month);
        }
        if let Some(ticket) = calendar.mount() {
            let retriever = retriever.clone();
            fetches.spawn(async move { (index, ticket.resolve(&retriever).await) });
        }
    }

    let spinner = (!json && !fetches.is_empty()).then(|| fetch_spinner(fetches.len()));
    while let Some(joined) = fetches.join_next().await {
        let (index, completion) = joined.context("Feed task failed")?;
        calendars[index].apply(completion);
        if let Some(spinner) = &spinner {
            set_remaining(spinner, fetches.len());
        }
    }
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let views: Vec<CalendarView> = listings
            .iter()
            .zip(&calendars)
            .map(|(listing, calendar)| CalendarView {
                id: &listing.id,
                title: &listing.title,
                error: calendar.error(),
                grid: calendar.grid(today),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for (i, (listing, calendar)) in listings.iter().zip(&calendars).enumerate() {
        println!("{}", render_calendar(listing, calendar, today));

        // Add spacing between listings (but not after the last one)
        if i < listings.len() - 1 {
            println!();
        }
    }

    Ok(())
}

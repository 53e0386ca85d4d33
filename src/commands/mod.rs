pub mod browse;
pub mod listings;
pub mod show;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use staycal_core::{Listing, StaycalConfig};

/// Listings to operate on: one by id, or all of them.
fn select_listings<'a>(config: &'a StaycalConfig, id: Option<&str>) -> Result<Vec<&'a Listing>> {
    match id {
        Some(id) => Ok(vec![config.listing(id)?]),
        None => Ok(config.listings.iter().collect()),
    }
}

/// Past days are judged against the local date, as a visitor would see them.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

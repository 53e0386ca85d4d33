use anyhow::Result;
use owo_colors::OwoColorize;
use staycal_core::StaycalConfig;

use crate::render::Render;

pub fn run(config: &StaycalConfig) -> Result<()> {
    for listing in &config.listings {
        let feed = match listing.feed_host() {
            Some(host) => format!("iCal: {}", host),
            None if listing.ical_url.is_some() => "iCal: invalid URL".to_string(),
            None => "no calendar".to_string(),
        };

        println!("{} {}", format!("[{}]", listing.id).bold(), listing.render());
        println!("    {}", feed.dimmed());
        if let Some(booking) = &listing.booking_url {
            println!("    {}", booking.dimmed());
        }
    }

    Ok(())
}

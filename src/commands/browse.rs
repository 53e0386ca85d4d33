//! Interactive month browser.
//!
//! Every listing gets its own widget and all feeds are fetched up front, the
//! way the site mounts one calendar per listing. Keys are read one at a time
//! on the blocking pool, so a completion for the listing on screen redraws it
//! while the browser waits for input.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dialoguer::Select;
use dialoguer::console::{Key, Term};
use owo_colors::OwoColorize;
use staycal_core::{
    Applied, AvailabilityCalendar, FeedRetriever, FetchCompletion, FetchTicket, Listing,
    StaycalConfig,
};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::debug;

use super::today;
use crate::render::render_calendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Previous,
    Next,
    Reload,
    SwitchListing,
    Quit,
}

const KEY_HINT: &str =
    "← mois précédent   → mois suivant   r recharger   l changer de logement   q quitter";

fn action_for_key(key: &Key) -> Option<Action> {
    match key {
        Key::ArrowLeft | Key::Char('p') => Some(Action::Previous),
        Key::ArrowRight | Key::Char('n') => Some(Action::Next),
        Key::Char('r') => Some(Action::Reload),
        Key::Char('l') => Some(Action::SwitchListing),
        Key::Char('q') | Key::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Only a current completion for the listing on screen changes what is shown.
fn needs_redraw(index: usize, current: usize, applied: Applied) -> bool {
    index == current && applied != Applied::Stale
}

fn draw(term: &Term, listing: &Listing, calendar: &AvailabilityCalendar, today: NaiveDate) -> Result<()> {
    term.clear_screen()?;
    term.write_line(&render_calendar(listing, calendar, today))?;
    term.write_line("")?;
    term.write_line(&KEY_HINT.dimmed().to_string())?;
    Ok(())
}

type Completions = UnboundedSender<(usize, FetchCompletion)>;

fn spawn_fetch(index: usize, ticket: FetchTicket, retriever: &FeedRetriever, tx: &Completions) {
    let retriever = retriever.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = ticket.resolve(&retriever).await;
        // The receiver is gone once the browser has quit
        let _ = tx.send((index, completion));
    });
}

fn prompt_listing(titles: Vec<String>, current: usize) -> Result<usize> {
    let selection = Select::new()
        .with_prompt("Logement")
        .items(&titles)
        .default(current)
        .interact_opt()?;

    Ok(selection.unwrap_or(current))
}

pub async fn run(config: &StaycalConfig, listing_id: Option<&str>) -> Result<()> {
    let retriever = FeedRetriever::new(config.proxy_endpoint()?);
    let today = today();

    let mut current = match listing_id {
        Some(id) => {
            let listing = config.listing(id)?;
            config.listings.iter().position(|l| l.id == listing.id).unwrap_or(0)
        }
        None => 0,
    };

    let mut calendars: Vec<AvailabilityCalendar> = config
        .listings
        .iter()
        .map(|listing| AvailabilityCalendar::new(listing.ical_url.clone(), today))
        .collect();

    let (tx, mut rx) = unbounded_channel();
    for (index, calendar) in calendars.iter_mut().enumerate() {
        if let Some(ticket) = calendar.mount() {
            spawn_fetch(index, ticket, &retriever, &tx);
        }
    }

    let term = Term::stdout();
    let mut redraw = true;
    loop {
        if redraw {
            draw(&term, &config.listings[current], &calendars[current], today)?;
        }

        let mut key_reader = tokio::task::spawn_blocking(|| Term::stdout().read_key());
        let key = loop {
            tokio::select! {
                joined = &mut key_reader => break joined.context("Key reader failed")??,
                Some((index, completion)) = rx.recv() => {
                    let applied = calendars[index].apply(completion);
                    debug!(listing = %config.listings[index].id, ?applied, "feed completion");
                    if needs_redraw(index, current, applied) {
                        draw(&term, &config.listings[current], &calendars[current], today)?;
                    }
                }
            }
        };

        let Some(action) = action_for_key(&key) else {
            redraw = false;
            continue;
        };
        redraw = true;

        match action {
            Action::Previous => calendars[current].show_previous_month(),
            Action::Next => calendars[current].show_next_month(),
            Action::Reload => {
                if let Some(ticket) = calendars[current].mount() {
                    spawn_fetch(current, ticket, &retriever, &tx);
                }
            }
            Action::SwitchListing => {
                let titles: Vec<String> = config.listings.iter().map(|l| l.title.clone()).collect();
                current = tokio::task::spawn_blocking(move || prompt_listing(titles, current))
                    .await
                    .context("Prompt task failed")??;
            }
            Action::Quit => break,
        }
    }

    for calendar in &mut calendars {
        calendar.unmount();
    }

    Ok(())
}

//! Terminal rendering for availability calendars.
//!
//! Labels are French, as on the listings' site.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use staycal_core::{AvailabilityCalendar, DayCell, Listing, MonthCursor, MonthGrid};

const MONTH_NAMES: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const WEEKDAY_HEADERS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

const SOURCE_NOTE: &str = "Source : iCal (lecture seule).";

const INDENT: &str = "   ";

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MonthCursor {
    /// "janvier 2025"
    fn render(&self) -> String {
        let name = MONTH_NAMES[(self.month() - 1) as usize];
        format!("{} {}", name, self.year())
    }
}

impl Render for DayCell {
    fn render(&self) -> String {
        let day = format!("{:>3}", self.date.day());

        let styled = if self.is_other_month {
            day.dimmed().to_string()
        } else if self.is_busy {
            day.red().to_string()
        } else {
            day.green().to_string()
        };

        if self.is_past && !self.is_other_month {
            styled.dimmed().to_string()
        } else {
            styled
        }
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|d| format!("{:>3}", d)).collect();

        let mut lines = vec![
            format!("{}{}", INDENT, self.month.render().bold()),
            format!("{}{}", INDENT, header.join(" ").dimmed()),
        ];
        for week in self.weeks() {
            let cells: Vec<String> = week.iter().map(Render::render).collect();
            lines.push(format!("{}{}", INDENT, cells.join(" ")));
        }

        lines.join("\n")
    }
}

impl Render for Listing {
    fn render(&self) -> String {
        match &self.location {
            Some(location) => format!("🏠 {} {}", self.title.bold(), location.dimmed()),
            None => format!("🏠 {}", self.title.bold()),
        }
    }
}

fn legend() -> String {
    format!(
        "{}{} {}   {} {}",
        INDENT,
        "■".red(),
        "Indisponible".dimmed(),
        "■".green(),
        "Disponible".dimmed()
    )
}

/// Full widget: listing header, month grid, legend, error and source note.
pub fn render_calendar(listing: &Listing, calendar: &AvailabilityCalendar, today: NaiveDate) -> String {
    let mut lines = vec![listing.render()];

    if calendar.feed_url().is_none() {
        lines.push(format!("{}{}", INDENT, "Aucun calendrier iCal configuré.".dimmed()));
    } else if calendar.is_loading() {
        lines.push(format!("{}{}", INDENT, "Chargement…".dimmed()));
    }

    lines.push(calendar.grid(today).render());
    lines.push(legend());

    if let Some(error) = calendar.error() {
        lines.push(format!("{}{}", INDENT, error.yellow()));
    }
    lines.push(format!("{}{}", INDENT, SOURCE_NOTE.dimmed()));

    lines.join("\n")
}

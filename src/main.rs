mod commands;
mod logging;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use staycal_core::{MonthCursor, StaycalConfig};

#[derive(Parser)]
#[command(name = "staycal")]
#[command(about = "Show the availability calendars of your rental listings from their iCal feeds")]
struct Cli {
    /// Config file (defaults to ~/.config/staycal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log feed requests and retries
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured listings
    Listings,
    /// Print the month grid of each listing
    Show {
        /// Only show this listing (by id)
        #[arg(short, long)]
        listing: Option<String>,

        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long, value_parser = MonthCursor::parse)]
        month: Option<MonthCursor>,

        /// Print the grid as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Browse a listing's calendar month by month
    Browse {
        /// Listing to start with (by id)
        #[arg(short, long)]
        listing: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = StaycalConfig::load(cli.config.as_deref())?;
    require_listings(&config, cli.config.as_deref())?;

    match cli.command {
        Commands::Listings => commands::listings::run(&config),
        Commands::Show {
            listing,
            month,
            json,
        } => commands::show::run(&config, listing.as_deref(), month, json).await,
        Commands::Browse { listing } => commands::browse::run(&config, listing.as_deref()).await,
    }
}

fn require_listings(config: &StaycalConfig, path: Option<&std::path::Path>) -> Result<()> {
    if config.listings.is_empty() {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => StaycalConfig::default_path()?,
        };
        anyhow::bail!(
            "No listings configured.\n\n\
            Add one to {}:\n  \
            site_url = \"https://example.com\"\n\n  \
            [[listings]]\n  \
            id = \"A\"\n  \
            title = \"Villa by the sea\"\n  \
            ical_url = \"https://www.airbnb.com/calendar/ical/123.ics?s=...\"",
            path.display()
        );
    }

    Ok(())
}

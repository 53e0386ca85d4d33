use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Spinner shown while feeds are being fetched.
pub fn fetch_spinner(pending: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    set_remaining(&spinner, pending);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub fn set_remaining(spinner: &ProgressBar, pending: usize) {
    let noun = if pending == 1 { "calendrier" } else { "calendriers" };
    spinner.set_message(format!("Chargement de {} {}", pending, noun).dimmed().to_string());
}

//! Listing configuration at ~/.config/staycal/config.toml

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ::config::{Config, File};
use serde::Deserialize;
use url::Url;

use crate::constants::PROXY_PATH;
use crate::error::{CalendarError, CalendarResult};

/// A rental listing with its availability feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub location: Option<String>,

    /// iCal export of the listing's booking calendar.
    #[serde(default)]
    pub ical_url: Option<String>,

    #[serde(default)]
    pub booking_url: Option<String>,
}

impl Listing {
    /// Host of the feed, for display.
    pub fn feed_host(&self) -> Option<String> {
        let url = Url::parse(self.ical_url.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaycalConfig {
    /// Origin of the site serving the relay at `/api/ics-proxy`.
    #[serde(default)]
    pub site_url: Option<String>,

    /// Full relay endpoint; takes precedence over `site_url`.
    #[serde(default)]
    pub proxy_url: Option<String>,

    #[serde(default)]
    pub listings: Vec<Listing>,
}

impl StaycalConfig {
    pub fn default_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("staycal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location (creating a commented
    /// template there on first run).
    pub fn load(path: Option<&Path>) -> CalendarResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()),
            None => {
                let p = Self::default_path()?;
                if !p.exists() {
                    Self::create_default_config(&p)?;
                }
                p
            }
        };

        if !config_path.exists() {
            return Err(CalendarError::Config(format!(
                "Config file not found at {}",
                config_path.display()
            )));
        }

        let config: StaycalConfig = Config::builder()
            .add_source(File::from(config_path))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CalendarResult<()> {
        let mut seen = HashSet::new();
        for listing in &self.listings {
            if listing.id.trim().is_empty() {
                return Err(CalendarError::Config(format!(
                    "Listing '{}' has an empty id",
                    listing.title
                )));
            }
            if !seen.insert(listing.id.as_str()) {
                return Err(CalendarError::Config(format!(
                    "Duplicate listing id '{}'",
                    listing.id
                )));
            }
        }
        Ok(())
    }

    /// The relay endpoint used when a direct feed fetch fails.
    pub fn proxy_endpoint(&self) -> CalendarResult<Url> {
        if let Some(proxy) = &self.proxy_url {
            return parse_url(proxy);
        }

        let site = self.site_url.as_deref().ok_or_else(|| {
            CalendarError::Config(
                "No proxy configured. Set `site_url` (or `proxy_url`) in config.toml".into(),
            )
        })?;

        parse_url(site)?
            .join(PROXY_PATH)
            .map_err(|source| CalendarError::InvalidUrl {
                url: site.to_string(),
                source,
            })
    }

    pub fn listing(&self, id: &str) -> CalendarResult<&Listing> {
        self.listings.iter().find(|l| l.id == id).ok_or_else(|| {
            let available: Vec<_> = self.listings.iter().map(|l| l.id.as_str()).collect();
            CalendarError::Config(format!(
                "Listing '{}' not found. Available: {}",
                id,
                available.join(", ")
            ))
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = "\
# staycal configuration

# Site hosting the iCal relay at /api/ics-proxy:
# site_url = \"https://example.com\"

# Or the relay endpoint itself:
# proxy_url = \"https://example.com/api/ics-proxy\"

# One block per listing:
# [[listings]]
# id = \"A\"
# title = \"Villa by the sea\"
# location = \"Andalusia, Spain\"
# ical_url = \"https://www.airbnb.com/calendar/ical/123.ics?s=...\"
# booking_url = \"https://www.airbnb.com/rooms/123\"
";

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn parse_url(raw: &str) -> CalendarResult<Url> {
    Url::parse(raw).map_err(|source| CalendarError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_listings() {
        let file = write_config(indoc! {r#"
            site_url = "https://villas.example"

            [[listings]]
            id = "A"
            title = "Villa"
            location = "Andalusia"
            ical_url = "https://www.airbnb.fr/calendar/ical/1.ics?s=abc"

            [[listings]]
            id = "B"
            title = "Beach house"
        "#});

        let config = StaycalConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.listings.len(), 2);
        assert_eq!(config.listing("A").unwrap().feed_host().as_deref(), Some("www.airbnb.fr"));
        assert_eq!(config.listing("B").unwrap().ical_url, None);
        assert_eq!(
            config.proxy_endpoint().unwrap().as_str(),
            "https://villas.example/api/ics-proxy"
        );
    }

    #[test]
    fn test_proxy_url_overrides_site_url() {
        let file = write_config(indoc! {r#"
            site_url = "https://villas.example"
            proxy_url = "https://relay.example/ics"
        "#});

        let config = StaycalConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.proxy_endpoint().unwrap().as_str(), "https://relay.example/ics");
    }

    #[test]
    fn test_missing_proxy_is_a_config_error() {
        let file = write_config("listings = []\n");

        let config = StaycalConfig::load(Some(file.path())).unwrap();
        assert!(matches!(config.proxy_endpoint(), Err(CalendarError::Config(_))));
    }

    #[test]
    fn test_duplicate_listing_ids_rejected() {
        let file = write_config(indoc! {r#"
            [[listings]]
            id = "A"
            title = "One"

            [[listings]]
            id = "A"
            title = "Two"
        "#});

        let err = StaycalConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Duplicate listing id 'A'"));
    }

    #[test]
    fn test_unknown_listing_names_available_ids() {
        let file = write_config(indoc! {r#"
            [[listings]]
            id = "A"
            title = "One"
        "#});

        let config = StaycalConfig::load(Some(file.path())).unwrap();
        let err = config.listing("Z").unwrap_err();
        assert!(err.to_string().contains("Available: A"));
    }

    #[test]
    fn test_default_config_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staycal").join("config.toml");

        StaycalConfig::create_default_config(&path).unwrap();
        let config = StaycalConfig::load(Some(&path)).unwrap();

        assert!(config.listings.is_empty());
        assert!(config.site_url.is_none());
    }
}

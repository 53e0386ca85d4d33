/// Number of cells in a month grid (six Monday-first weeks).
pub const GRID_CELLS: usize = 42;

pub const DAYS_PER_WEEK: usize = 7;

/// Path of the CORS relay on the site origin.
pub const PROXY_PATH: &str = "/api/ics-proxy";

/// Query parameter carrying the upstream feed URL.
pub const PROXY_URL_PARAM: &str = "url";

/// Shown under the grid when both the direct and proxied fetch failed.
pub const UNAVAILABLE_MESSAGE: &str =
    "Calendrier indisponible. Si le problème persiste, vérifiez le proxy iCal.";

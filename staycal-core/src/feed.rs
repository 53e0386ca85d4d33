//! Feed retrieval with a single fallback through the CORS relay.
//!
//! The direct fetch is tried first. If it fails for any reason (network,
//! non-2xx status) the same feed is requested once through the relay, which
//! returns the upstream body verbatim. The relay is never retried.

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::constants::PROXY_URL_PARAM;
use crate::error::{CalendarError, CalendarResult, FetchFailure};

/// Which attempt produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Direct,
    Proxy,
}

/// Raw calendar text as returned by the feed or relay.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub text: String,
    pub source: FeedSource,
}

/// Fetches feed documents. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct FeedRetriever {
    client: Client,
    proxy_endpoint: Url,
}

impl FeedRetriever {
    pub fn new(proxy_endpoint: Url) -> Self {
        Self::with_client(Client::new(), proxy_endpoint)
    }

    pub fn with_client(client: Client, proxy_endpoint: Url) -> Self {
        FeedRetriever {
            client,
            proxy_endpoint,
        }
    }

    pub fn proxy_endpoint(&self) -> &Url {
        &self.proxy_endpoint
    }

    /// Relay URL for `feed_url`: `<endpoint>?url=<percent-encoded feed_url>`.
    pub fn proxied_url(&self, feed_url: &str) -> Url {
        let mut url = self.proxy_endpoint.clone();
        url.query_pairs_mut().append_pair(PROXY_URL_PARAM, feed_url);
        url
    }

    /// Fetch `feed_url`, falling back to the relay once if the direct fetch fails.
    pub async fn retrieve(&self, feed_url: &str) -> CalendarResult<FeedDocument> {
        match self.retrieve_direct(feed_url).await {
            Ok(text) => Ok(FeedDocument {
                text,
                source: FeedSource::Direct,
            }),
            Err(e) => {
                warn!("{e}; retrying through proxy");
                let text = self.retrieve_via_proxy(feed_url).await?;
                Ok(FeedDocument {
                    text,
                    source: FeedSource::Proxy,
                })
            }
        }
    }

    pub async fn retrieve_direct(&self, feed_url: &str) -> CalendarResult<String> {
        debug!(url = feed_url, "fetching feed");
        self.fetch_text(feed_url)
            .await
            .map_err(|source| CalendarError::Transport {
                url: feed_url.to_string(),
                source,
            })
    }

    pub async fn retrieve_via_proxy(&self, feed_url: &str) -> CalendarResult<String> {
        let proxied = self.proxied_url(feed_url);
        debug!(url = %proxied, "fetching feed through proxy");
        self.fetch_text(proxied.as_str())
            .await
            .map_err(|source| CalendarError::Proxy {
                url: feed_url.to_string(),
                source,
            })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        Ok(response.text().await?)
    }
}

//! HTTP client for RSS feeds.

use std::time::Duration;

use reqwest::Client;

use crate::error::{FeedError, ParseError};
use crate::parse::parse_rss;
use crate::types::RssFeed;

/// User agent sent with every feed request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "gator";

/// Fetches and parses RSS feeds.
///
/// One GET per call, no retries: a feed that fails is simply picked up again
/// on a later polling cycle. Dropping the future returned by
/// [`FeedClient::fetch_feed`] aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with a request timeout and fixed `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(FeedError::Client)?;
        Ok(Self { client })
    }

    /// Fetches `url` and parses the body as RSS.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Fetch`]: network/TLS failure, timeout, or non-2xx status.
    /// - [`FeedError::Read`]: the body could not be read in full.
    /// - [`FeedError::Parse`]: the body is not UTF-8 or not well-formed RSS/XML.
    pub async fn fetch_feed(&self, url: &str) -> Result<RssFeed, FeedError> {
        let fetch_err = |source| FeedError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;

        let body = response.bytes().await.map_err(|source| FeedError::Read {
            url: url.to_string(),
            source,
        })?;

        let feed = parse_body(&body).map_err(|source| FeedError::Parse {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!(
            feed_url = url,
            items = feed.channel.items.len(),
            "fetched feed"
        );

        Ok(feed)
    }
}

/// Bodies must be UTF-8, whatever the XML declaration or `Content-Type` says.
fn parse_body(body: &[u8]) -> Result<RssFeed, ParseError> {
    let text = std::str::from_utf8(body)?;
    parse_rss(text.strip_prefix('\u{feff}').unwrap_or(text))
}

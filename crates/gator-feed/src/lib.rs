//! RSS fetching, parsing, and publication-date normalization.

pub mod client;
pub mod dates;
pub mod error;
pub mod parse;
pub mod types;

pub use client::{FeedClient, DEFAULT_USER_AGENT};
pub use dates::{normalize_pub_date, PubDate, PUB_DATE_FORMAT};
pub use error::{FeedError, ParseError};
pub use parse::parse_rss;
pub use types::{RssChannel, RssFeed, RssItem};

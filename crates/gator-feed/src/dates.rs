//! Publication-date normalization.

use chrono::{DateTime, Utc};

/// The single layout accepted for `<pubDate>`: RFC 1123 with a numeric zone,
/// e.g. `Mon, 02 Jan 2006 15:04:05 -0700`.
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Outcome of normalizing a feed-supplied publication date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubDate {
    Parsed(DateTime<Utc>),
    /// The raw value did not match [`PUB_DATE_FORMAT`]; `at` is the fallback.
    Fallback { at: DateTime<Utc>, reason: String },
}

impl PubDate {
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PubDate::Parsed(at) | PubDate::Fallback { at, .. } => *at,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, PubDate::Fallback { .. })
    }
}

/// Parse `raw` with [`PUB_DATE_FORMAT`], substituting `fallback` on failure.
///
/// Never fails: a malformed date must not keep an otherwise valid item out
/// of the store. Callers log the [`PubDate::Fallback`] reason.
#[must_use]
pub fn normalize_pub_date(raw: &str, fallback: DateTime<Utc>) -> PubDate {
    match DateTime::parse_from_str(raw.trim(), PUB_DATE_FORMAT) {
        Ok(parsed) => PubDate::Parsed(parsed.with_timezone(&Utc)),
        Err(e) => PubDate::Fallback {
            at: fallback,
            reason: e.to_string(),
        },
    }
}

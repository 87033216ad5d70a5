//! One scrape cycle: pick the stalest feed, fetch it, and store its items.

use chrono::{DateTime, Utc};
use gator_core::{Feed, FeedStore, NewPost, StoreError};
use gator_feed::{normalize_pub_date, FeedClient, FeedError, PubDate, RssItem};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no feeds to fetch")]
    NoFeeds,

    #[error("store error: {0}")]
    Store(#[source] StoreError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NoFeeds => Self::NoFeeds,
            other => Self::Store(other),
        }
    }
}

/// Summary of one completed scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub feed: Feed,
    /// Items present in the fetched document.
    pub items: usize,
    pub inserted: usize,
    /// Items whose URL was already stored.
    pub duplicates: usize,
    /// Items the store rejected for any reason other than a duplicate URL.
    pub failed: usize,
    /// Items stored with the cycle time because their `pubDate` did not parse.
    pub fallback_dates: usize,
    pub fetched_at: DateTime<Utc>,
}

/// Run one scrape cycle against the feed most in need of a refresh.
///
/// The feed is marked fetched before the HTTP request is made, so a feed that
/// keeps failing still rotates to the back of the queue. Per-item insert
/// failures are logged and counted; they never abort the cycle.
///
/// # Errors
///
/// - [`IngestError::NoFeeds`] when the store holds no feeds.
/// - [`IngestError::Store`] when the feed cannot be selected or marked.
/// - [`IngestError::Feed`] when the fetch or parse fails. The mark stays.
pub async fn scrape_next_feed<S: FeedStore>(
    store: &S,
    client: &FeedClient,
) -> Result<CycleReport, IngestError> {
    let feed = store.next_feed_to_fetch().await?;

    let now = Utc::now();
    store.mark_feed_fetched(feed.id, now).await?;

    tracing::info!(feed_name = %feed.name, feed_url = %feed.url, "fetching feed");
    let document = client.fetch_feed(&feed.url).await?;

    let mut report = CycleReport {
        items: document.channel.items.len(),
        inserted: 0,
        duplicates: 0,
        failed: 0,
        fallback_dates: 0,
        fetched_at: now,
        feed,
    };

    for item in &document.channel.items {
        let post = build_post(&report.feed, item, now, &mut report.fallback_dates);

        match store.insert_post(&post).await {
            Ok(()) => report.inserted += 1,
            Err(StoreError::DuplicateUrl(_)) => report.duplicates += 1,
            Err(e) => {
                tracing::warn!(
                    feed_url = %report.feed.url,
                    title = %item.title,
                    error = %e,
                    "failed to store post"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        feed_url = %report.feed.url,
        items = report.items,
        inserted = report.inserted,
        duplicates = report.duplicates,
        failed = report.failed,
        "feed ingested"
    );

    Ok(report)
}

fn build_post(feed: &Feed, item: &RssItem, now: DateTime<Utc>, fallbacks: &mut usize) -> NewPost {
    let published_at = match normalize_pub_date(&item.pub_date, now) {
        PubDate::Parsed(at) => at,
        PubDate::Fallback { at, reason } => {
            tracing::warn!(
                feed_url = %feed.url,
                title = %item.title,
                pub_date = %item.pub_date,
                reason = %reason,
                "unparseable pubDate; using ingestion time"
            );
            *fallbacks += 1;
            at
        }
    };

    NewPost {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: item.title.clone(),
        url: item.link.clone(),
        description: (!item.description.is_empty()).then(|| item.description.clone()),
        published_at,
        feed_id: feed.id,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn feed() -> Feed {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Feed {
            id: Uuid::new_v4(),
            name: "Blog".to_string(),
            url: "https://blog.test/index.xml".to_string(),
            user_id: Uuid::new_v4(),
            created_at: at,
            updated_at: at,
            last_fetched_at: None,
        }
    }

    fn item(pub_date: &str, description: &str) -> RssItem {
        RssItem {
            title: "Post".to_string(),
            link: "https://blog.test/post".to_string(),
            description: description.to_string(),
            pub_date: pub_date.to_string(),
        }
    }

    #[test]
    fn build_post_uses_parsed_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut fallbacks = 0;
        let post = build_post(
            &feed(),
            &item("Mon, 02 Jan 2006 15:04:05 -0700", "body"),
            now,
            &mut fallbacks,
        );
        assert_eq!(
            post.published_at,
            Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap()
        );
        assert_eq!(post.description.as_deref(), Some("body"));
        assert_eq!(post.created_at, now);
        assert_eq!(fallbacks, 0);
    }

    #[test]
    fn build_post_falls_back_to_cycle_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut fallbacks = 0;
        let post = build_post(&feed(), &item("last tuesday", ""), now, &mut fallbacks);
        assert_eq!(post.published_at, now);
        assert_eq!(post.description, None);
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn no_feeds_store_error_maps_to_no_feeds() {
        assert!(matches!(
            IngestError::from(StoreError::NoFeeds),
            IngestError::NoFeeds
        ));
        assert!(matches!(
            IngestError::from(StoreError::Backend("down".into())),
            IngestError::Store(StoreError::Backend(_))
        ));
    }
}

//! In-memory `FeedStore` shared by the pipeline tests.

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use gator_core::{Feed, FeedStore, NewPost, StoreError};
use uuid::Uuid;

#[derive(Default)]
struct State {
    feeds: Vec<Feed>,
    posts: Vec<NewPost>,
    selections: Vec<Uuid>,
}

/// Mirrors the Postgres store's observable behaviour: null-first selection,
/// unique post URLs, and unknown-feed errors.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_marks: bool,
    reject_url: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `mark_feed_fetched` call fails with a backend error.
    pub fn with_failing_marks() -> Self {
        Self {
            fail_marks: true,
            ..Self::default()
        }
    }

    /// Inserts for `url` fail with a backend error.
    pub fn rejecting(url: &str) -> Self {
        Self {
            reject_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Adds a feed; `fetched_ago` of `None` means never fetched.
    pub fn add_feed(&self, name: &str, url: &str, fetched_ago: Option<Duration>) -> Feed {
        let now = Utc::now();
        let feed = Feed {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: url.to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            last_fetched_at: fetched_ago.map(|ago| now - ago),
        };
        self.state.lock().unwrap().feeds.push(feed.clone());
        feed
    }

    pub fn feed(&self, id: Uuid) -> Feed {
        self.state
            .lock()
            .unwrap()
            .feeds
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .expect("feed exists")
    }

    pub fn posts(&self) -> Vec<NewPost> {
        self.state.lock().unwrap().posts.clone()
    }

    /// Feed ids in the order they were handed out by `next_feed_to_fetch`.
    pub fn selections(&self) -> Vec<Uuid> {
        self.state.lock().unwrap().selections.clone()
    }
}

impl FeedStore for MemoryStore {
    async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError> {
        let mut state = self.state.lock().unwrap();
        let next = state
            .feeds
            .iter()
            .min_by_key(|f| (f.last_fetched_at, f.id))
            .cloned()
            .ok_or(StoreError::NoFeeds)?;
        state.selections.push(next.id);
        Ok(next)
    }

    async fn mark_feed_fetched(
        &self,
        feed_id: Uuid,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_marks {
            return Err(StoreError::Backend("mark rejected".into()));
        }
        let mut state = self.state.lock().unwrap();
        let feed = state
            .feeds
            .iter_mut()
            .find(|f| f.id == feed_id)
            .ok_or_else(|| StoreError::Backend(format!("unknown feed {feed_id}").into()))?;
        feed.last_fetched_at = Some(fetched_at);
        feed.updated_at = fetched_at;
        Ok(())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<(), StoreError> {
        if self.reject_url.as_deref() == Some(post.url.as_str()) {
            return Err(StoreError::Backend("insert rejected".into()));
        }
        let mut state = self.state.lock().unwrap();
        if state.posts.iter().any(|p| p.url == post.url) {
            return Err(StoreError::DuplicateUrl(post.url.clone()));
        }
        state.posts.push(post.clone());
        Ok(())
    }
}

/// An RSS document with one `<item>` per `(title, link, pub_date)`.
pub fn rss(items: &[(&str, &str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, link, pub_date)| {
            format!(
                "<item><title>{title}</title><link>{link}</link>\
                 <pubDate>{pub_date}</pubDate><description>about {link}</description></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Test</title><link>https://test.invalid/</link>
<description>Test feed</description>{body}</channel></rss>"#
    )
}

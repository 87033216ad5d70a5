//! Feed and follow commands: `addfeed`, `feeds`, `follow`, `following`,
//! `unfollow`.

use anyhow::Context;

use crate::{require_current_user, Session};

pub(crate) async fn add(session: &Session, name: &str, url: &str) -> anyhow::Result<()> {
    let user = require_current_user(session).await?;

    let feed = match gator_db::create_feed(&session.pool, name, url, user.id).await {
        Ok(feed) => feed,
        Err(e) if e.is_unique_violation(gator_db::FEEDS_URL_KEY) => {
            anyhow::bail!("a feed with url '{url}' already exists; use `gator follow {url}`")
        }
        Err(e) => return Err(e).context("failed to create feed"),
    };

    gator_db::create_feed_follow(&session.pool, user.id, feed.id)
        .await
        .context("failed to follow new feed")?;

    tracing::debug!(feed_id = %feed.id, feed_url = %feed.url, "feed added");
    println!("New feed: {} ({}) owned by {}", feed.name, feed.url, user.name);
    Ok(())
}

pub(crate) async fn list(session: &Session) -> anyhow::Result<()> {
    let feeds = gator_db::list_feeds_with_owner(&session.pool)
        .await
        .context("failed to list feeds")?;

    for feed in &feeds {
        println!("{} {} {}", feed.name, feed.url, feed.owner_name);
    }
    Ok(())
}

pub(crate) async fn follow(session: &Session, url: &str) -> anyhow::Result<()> {
    let user = require_current_user(session).await?;
    let feed = find_feed(session, url).await?;

    let follow = match gator_db::create_feed_follow(&session.pool, user.id, feed.id).await {
        Ok(follow) => follow,
        Err(e) if e.is_unique_violation(gator_db::FEED_FOLLOWS_USER_FEED_KEY) => {
            anyhow::bail!("user '{}' already follows '{url}'", user.name)
        }
        Err(e) => return Err(e).context("failed to follow feed"),
    };

    println!(
        "User '{}' now following feed '{}'",
        follow.user_name, follow.feed_name
    );
    Ok(())
}

pub(crate) async fn following(session: &Session) -> anyhow::Result<()> {
    let user = require_current_user(session).await?;
    let follows = gator_db::list_feed_follows_for_user(&session.pool, user.id)
        .await
        .context("failed to list follows")?;

    for follow in &follows {
        println!("{}", follow.feed_name);
    }
    Ok(())
}

pub(crate) async fn unfollow(session: &Session, url: &str) -> anyhow::Result<()> {
    let user = require_current_user(session).await?;
    let feed = find_feed(session, url).await?;

    match gator_db::delete_feed_follow(&session.pool, user.id, feed.id).await {
        Ok(()) => {}
        Err(gator_db::DbError::NotFound) => {
            anyhow::bail!("user '{}' does not follow '{url}'", user.name)
        }
        Err(e) => return Err(e).context("failed to unfollow feed"),
    }

    println!("User '{}' unfollowed feed '{}'", user.name, feed.name);
    Ok(())
}

async fn find_feed(session: &Session, url: &str) -> anyhow::Result<gator_db::FeedRow> {
    match gator_db::get_feed_by_url(&session.pool, url).await {
        Ok(feed) => Ok(feed),
        Err(gator_db::DbError::NotFound) => anyhow::bail!("feed url '{url}' not in database"),
        Err(e) => Err(e).context("failed to look up feed"),
    }
}

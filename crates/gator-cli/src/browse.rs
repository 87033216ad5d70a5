use anyhow::Context;
use chrono::{Local, TimeZone};

use crate::{require_current_user, Session};

pub(crate) async fn run(session: &Session, limit: i32) -> anyhow::Result<()> {
    let user = require_current_user(session).await?;
    let posts = gator_db::list_posts_for_user(&session.pool, user.id, i64::from(limit))
        .await
        .context("failed to list posts")?;

    for post in &posts {
        println!("{}", post_line(post, &Local));
    }
    Ok(())
}

/// `<published time> | <feed name> | <title>`, with the time shown in `tz`.
pub(crate) fn post_line<Tz>(post: &gator_db::PostWithFeedRow, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} | {} | {}",
        post.published_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S %Z"),
        post.feed_name,
        post.title
    )
}

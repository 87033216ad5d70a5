//! User commands: `register`, `login`, `reset`, `users`.

use anyhow::Context;

use crate::Session;

pub(crate) async fn register(session: &mut Session, name: &str) -> anyhow::Result<()> {
    let user = match gator_db::create_user(&session.pool, name).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation(gator_db::USERS_NAME_KEY) => {
            anyhow::bail!("user '{name}' already exists")
        }
        Err(e) => return Err(e).context("failed to create user"),
    };

    session
        .settings
        .set_user(&user.name, &session.config.settings_path)?;

    tracing::debug!(user_id = %user.id, "registered user");
    println!("Registered new user: {} ({})", user.name, user.id);
    Ok(())
}

pub(crate) async fn login(session: &mut Session, name: &str) -> anyhow::Result<()> {
    let user = match gator_db::get_user_by_name(&session.pool, name).await {
        Ok(user) => user,
        Err(gator_db::DbError::NotFound) => anyhow::bail!("could not log in: no user '{name}'"),
        Err(e) => return Err(e).context("failed to look up user"),
    };

    session
        .settings
        .set_user(&user.name, &session.config.settings_path)?;

    println!("Logged in as {}", user.name);
    Ok(())
}

pub(crate) async fn reset(session: &Session) -> anyhow::Result<()> {
    let deleted = gator_db::delete_all_users(&session.pool)
        .await
        .context("failed to reset users")?;

    tracing::info!(deleted, "users table reset");
    println!("Successfully reset users table");
    Ok(())
}

pub(crate) async fn list(session: &Session) -> anyhow::Result<()> {
    let users = gator_db::list_users(&session.pool)
        .await
        .context("failed to list users")?;

    let current = session.settings.current_user_name.as_deref();
    for user in &users {
        println!("{}", user_line(&user.name, current));
    }
    Ok(())
}

pub(crate) fn user_line(name: &str, current: Option<&str>) -> String {
    if current == Some(name) {
        format!("* {name} (current)")
    } else {
        format!("* {name}")
    }
}

mod agg;
mod browse;
mod feeds;
mod users;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gator_core::{AppConfig, PollInterval, Settings};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gator")]
#[command(about = "RSS feed aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a user and log in as them
    Register { name: String },
    /// Switch the current user
    Login { name: String },
    /// Delete every user along with their feeds, follows, and posts
    Reset,
    /// List registered users
    Users,
    /// Poll feeds forever, one feed per interval (e.g. 30s, 1m, 1h30m)
    Agg { interval: PollInterval },
    /// Add a feed owned by the current user and follow it
    Addfeed { name: String, url: String },
    /// List all feeds with their owners
    Feeds,
    /// Follow an existing feed by URL
    Follow { url: String },
    /// List the feeds the current user follows
    Following,
    /// Stop following a feed by URL
    Unfollow { url: String },
    /// Show the newest posts from followed feeds
    Browse {
        /// Maximum number of posts to show
        #[arg(default_value_t = 2, value_parser = clap::value_parser!(i32).range(1..))]
        limit: i32,
    },
}

/// Everything a command handler needs: config, the settings file, and a pool.
pub(crate) struct Session {
    pub config: AppConfig,
    pub settings: Settings,
    pub pool: PgPool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = gator_core::load_app_config()?;
    setup_tracing(&config.log_level)?;
    tracing::debug!(
        env = %config.env,
        settings_path = %config.settings_path.display(),
        "configuration loaded"
    );

    let settings = Settings::load(&config.settings_path)?;
    let database_url = resolve_database_url(&config, &settings).with_context(|| {
        format!(
            "no database URL: set DATABASE_URL or db_url in {}",
            config.settings_path.display()
        )
    })?;

    let pool_config = gator_db::PoolConfig::from_app_config(&config);
    let pool = gator_db::connect_pool(&database_url, pool_config)
        .await
        .context("failed to connect to database")?;
    gator_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let mut session = Session {
        config,
        settings,
        pool,
    };

    match cli.command {
        Commands::Register { name } => users::register(&mut session, &name).await,
        Commands::Login { name } => users::login(&mut session, &name).await,
        Commands::Reset => users::reset(&session).await,
        Commands::Users => users::list(&session).await,
        Commands::Agg { interval } => agg::run(&session, interval).await,
        Commands::Addfeed { name, url } => feeds::add(&session, &name, &url).await,
        Commands::Feeds => feeds::list(&session).await,
        Commands::Follow { url } => feeds::follow(&session, &url).await,
        Commands::Following => feeds::following(&session).await,
        Commands::Unfollow { url } => feeds::unfollow(&session, &url).await,
        Commands::Browse { limit } => browse::run(&session, limit).await,
    }
}

fn setup_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

/// `DATABASE_URL` wins over the settings file.
fn resolve_database_url(config: &AppConfig, settings: &Settings) -> Option<String> {
    config
        .database_url
        .clone()
        .or_else(|| settings.db_url.clone())
        .filter(|url| !url.trim().is_empty())
}

/// Looks up the user named in the settings file.
pub(crate) async fn require_current_user(session: &Session) -> anyhow::Result<gator_db::UserRow> {
    let name = session
        .settings
        .current_user_name
        .as_deref()
        .context("not logged in; run `gator register <name>` or `gator login <name>`")?;

    match gator_db::get_user_by_name(&session.pool, name).await {
        Ok(user) => Ok(user),
        Err(gator_db::DbError::NotFound) => {
            anyhow::bail!("current user '{name}' not in database")
        }
        Err(e) => Err(e).context("failed to look up current user"),
    }
}

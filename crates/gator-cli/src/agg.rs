use anyhow::Context;
use gator_core::PollInterval;
use gator_db::PgFeedStore;
use gator_feed::FeedClient;

use crate::Session;

/// Run the poll scheduler until Ctrl-C or SIGTERM.
pub(crate) async fn run(session: &Session, interval: PollInterval) -> anyhow::Result<()> {
    let client = FeedClient::new(session.config.fetch_timeout_secs, &session.config.user_agent)
        .context("failed to build feed client")?;
    let store = PgFeedStore::new(session.pool.clone());

    println!("Collecting feeds every {interval}");
    let cycles =
        gator_ingest::run_poll_scheduler(&store, &client, interval, shutdown_signal()).await;
    tracing::info!(cycles, "aggregator stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping aggregator");
}

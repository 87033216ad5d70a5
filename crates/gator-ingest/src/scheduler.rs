//! Fixed-interval polling loop.

use std::future::Future;

use gator_core::{FeedStore, PollInterval};
use gator_feed::FeedClient;
use tokio::time::{interval, MissedTickBehavior};

use crate::cycle::{scrape_next_feed, IngestError};

/// Run scrape cycles every `every` until `shutdown` resolves.
///
/// The first cycle starts immediately. Cycles never overlap: a tick that
/// comes due while a cycle is still running is delayed rather than queued.
/// Cycle errors are logged and the loop carries on. When `shutdown`
/// resolves, an in-flight cycle is dropped at its next await point.
///
/// Returns the number of cycles that ran to completion, successful or not.
pub async fn run_poll_scheduler<S, F>(
    store: &S,
    client: &FeedClient,
    every: PollInterval,
    shutdown: F,
) -> u64
where
    S: FeedStore,
    F: Future<Output = ()>,
{
    tracing::info!(interval = %every, "collecting feeds");

    let mut ticker = interval(every.as_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles: u64 = 0;
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            () = &mut shutdown => break,
            outcome = scrape_next_feed(store, client) => outcome,
        };
        cycles += 1;

        match outcome {
            Ok(_) => {}
            Err(IngestError::NoFeeds) => tracing::info!("no feeds to fetch"),
            Err(e) => tracing::warn!(error = %e, "scrape cycle failed"),
        }
    }

    tracing::info!(cycles, "poll scheduler stopped");
    cycles
}

//! The feed ingestion pipeline: one scrape cycle and the loop that repeats it.

pub mod cycle;
pub mod scheduler;

pub use cycle::{scrape_next_feed, CycleReport, IngestError};
pub use scheduler::run_poll_scheduler;

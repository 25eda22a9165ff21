//! Crawler module
//!
//! This module contains the core crawling logic:
//! - The sequential crawl loop and per-entry visit ([`Crawler`])
//! - Visit pacing ([`Scheduler`])
//! - The cooperative stop flag and signal listener

mod coordinator;
mod scheduler;
mod shutdown;

pub use coordinator::{Crawler, CrawlerOptions, RunOutcome, Step, VisitReport};
pub use scheduler::Scheduler;
pub use shutdown::{spawn_signal_listener, StopHandle};

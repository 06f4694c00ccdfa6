//! Collects Golden Tee scorecards from TeknoParrot user leaderboards.

pub mod classifier;
pub mod client;
pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod scraper;
pub mod users;

pub use classifier::{is_tracked, TRACKED_TITLES};
pub use client::GtClient;
pub use config::{Pacing, RetryPolicy, ScrapeConfig};
pub use error::{Result, ScrapeError};
pub use model::*;

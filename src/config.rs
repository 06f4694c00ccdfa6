use std::time::Duration;

/// Origin of the leaderboard site. Relative links are resolved against it.
pub const DEFAULT_BASE_URL: &str = "https://teknoparrot.com";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Settings shared by the fetcher and the collector.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Applied both as the connect timeout and the whole-request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub pacing: Pacing,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            pacing: Pacing::default(),
        }
    }
}

/// How many times a fetch is tried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Request pacing against the source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause between two detail-page fetches for the same user.
    pub between_entries: Duration,
    /// Pause between two users.
    pub between_users: Duration,
}

impl Pacing {
    /// No pauses at all. Intended for tests and local fixtures.
    pub const NONE: Pacing = Pacing {
        between_entries: Duration::ZERO,
        between_users: Duration::ZERO,
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_entries: Duration::from_secs(1),
            between_users: Duration::from_secs(2),
        }
    }
}

use tracing::instrument;

use crate::collect::Collector;
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::model::*;
use crate::scraper::fetch::HttpFetcher;
use crate::scraper::{leaderboard, scorecard, PageSource};

/// The main entry point for collecting scorecards from TeknoParrot.
///
/// `GtClient` owns a [`PageSource`] (an [`HttpFetcher`] unless built with
/// [`GtClient::with_source`]) together with the [`ScrapeConfig`] that
/// controls pacing and link resolution.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> gt_scraper::Result<()> {
/// use gt_scraper::GtClient;
///
/// let client = GtClient::new()?;
/// let records = client.collect(&["some-query-id".to_string()]).await;
/// println!("Collected {} scorecards", records.len());
/// # Ok(())
/// # }
/// ```
pub struct GtClient<S = HttpFetcher> {
    source: S,
    config: ScrapeConfig,
}

impl GtClient<HttpFetcher> {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(ScrapeConfig::default())
    }

    /// Create a client whose HTTP fetcher honors `config`.
    pub fn with_config(config: ScrapeConfig) -> Result<Self> {
        let source = HttpFetcher::new(&config)?;
        Ok(Self { source, config })
    }
}

impl<S: PageSource> GtClient<S> {
    /// Use any page source, e.g. a recorded site.
    pub fn with_source(source: S, config: ScrapeConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Fetch the detail links listed on a user's leaderboard page.
    #[instrument(skip(self))]
    pub async fn get_entry_links(&self, user_id: &str) -> Result<Vec<EntryLink>> {
        leaderboard::get_entry_links(&self.source, &self.config.base_url, user_id).await
    }

    /// Fetch and parse a single scorecard page. No game filtering is applied.
    #[instrument(skip(self))]
    pub async fn get_scorecard(&self, url: &str) -> Result<ScorecardRecord> {
        scorecard::get_scorecard(&self.source, url).await
    }

    /// Collect the tracked scorecards of every user, in order.
    pub async fn collect(&self, user_ids: &[String]) -> Vec<ScorecardRecord> {
        Collector::new(&self.source, &self.config.base_url, self.config.pacing)
            .collect_all(user_ids)
            .await
    }
}

use std::future::Future;

use tracing::{debug, instrument, warn};

use crate::config::{RetryPolicy, ScrapeConfig};
use crate::error::{Result, ScrapeError};
use crate::scraper::PageSource;

/// Fetches pages over HTTP, retrying transport failures and non-2xx
/// responses according to a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Build a fetcher with the timeout, user agent and retry policy from
    /// `config`.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(ScrapeError::ClientBuild)?;
        Ok(Self::with_client(http, config.retry))
    }

    /// Use a preconfigured [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, retry: RetryPolicy) -> Self {
        Self { http, retry }
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self.http.get(url).send().await.map_err(|e| ScrapeError::Http {
            url: url.to_owned(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| ScrapeError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}

impl PageSource for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        with_retry(url, self.retry, || self.fetch_once(url)).await
    }
}

/// Run `op` until it succeeds or `policy.attempts` is used up, sleeping
/// `policy.delay` between attempts. Every error counts as retryable.
pub(crate) async fn with_retry<T, F, Fut>(url: &str, policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!(url, attempt, attempts, error = %e, "fetch failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(url, attempt, attempts, error = %e, "fetch failed, giving up");
                return Err(ScrapeError::RetriesExhausted {
                    url: url.to_owned(),
                    attempts,
                    last: Box::new(e),
                });
            }
        }
    }
}

//! Fetcher Stage A: a plain static HTTP fetch with rotating User-Agents and
//! manual retry/backoff.
//!
//! The `reqwest::Client` builder shape (timeout, redirect policy, gzip, pool
//! sizing) is grounded on the teacher's `RateLimitedFetcher`; the retry
//! policy, header set, and content-type gate are grounded on the original's
//! `async_fetcher.py` (`tenacity`-driven exponential backoff, `HEADERS_BASE`,
//! the HTML content-type check).

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("response content-type was not HTML")]
    NonHtmlContent,
}

/// Result of a successful HTTP fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status_code: u16,
    pub body: String,
    pub final_url: String,
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(10);

/// Static HTTP fetcher used for Stage A of the fetch pipeline.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher.
    ///
    /// - `connect_timeout_secs`: per-connection timeout (the original uses a
    ///   5s connect timeout with no overall request timeout).
    pub fn new(connect_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .pool_max_idle_per_host(20)
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    fn random_user_agent(&self) -> &'static str {
        USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    /// Fetch `url`, retrying up to [`MAX_ATTEMPTS`] times with exponential
    /// backoff (1s base, 10s cap) on request-level failures. Returns
    /// [`FetchError::NonHtmlContent`] without retrying if the response's
    /// content-type header rules out HTML.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let mut last_err = None;

        for attempt in 0..MAX_ATTEMPTS {
            match self.try_fetch(url).await {
                Ok(result) => return Ok(result),
                Err(FetchError::NonHtmlContent) => return Err(FetchError::NonHtmlContent),
                Err(err) => {
                    last_err = Some(err);
                    if attempt + 1 < MAX_ATTEMPTS {
                        let backoff = (BACKOFF_BASE * 2u32.pow(attempt)).min(BACKOFF_CAP);
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(last_err.expect("loop runs at least once"))
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", self.random_user_agent())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Connection", "keep-alive")
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |ct| ct.contains("text/html"));

        if !is_html {
            return Err(FetchError::NonHtmlContent);
        }

        let body = response.text().await?;

        Ok(FetchResult {
            status_code,
            body,
            final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_picks_from_pool() {
        let fetcher = Fetcher::new(5);
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&fetcher.random_user_agent()));
        }
    }

    #[test]
    fn backoff_schedule_is_capped() {
        let delays: Vec<Duration> = (0..MAX_ATTEMPTS)
            .map(|attempt| (BACKOFF_BASE * 2u32.pow(attempt)).min(BACKOFF_CAP))
            .collect();
        assert_eq!(delays[0], Duration::from_secs(1));
        assert_eq!(delays[1], Duration::from_secs(2));
        assert!(delays[2] <= BACKOFF_CAP);
    }
}

//! HTTP client for WFS-style paginated JSON feeds.
//!
//! Every request carries a per-attempt deadline and is retried with
//! exponential backoff. Transient failures are surfaced upward as
//! warnings on the fetch result; only exhausting all retries produces an
//! error.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::paginate::{self, FEATURE_CAP};

/// Per-attempt request deadline.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff.
const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Page size requested from paginated feeds.
pub const DEFAULT_PAGE_SIZE: usize = 1_000;

/// Accumulated features from a paginated fetch.
#[derive(Debug)]
pub struct FeatureFetch {
    /// Raw feature objects, at most [`FEATURE_CAP`] of them.
    pub features: Vec<Value>,
    /// Transient problems encountered along the way.
    pub warnings: Vec<String>,
}

/// A retrying JSON client for WFS-style feeds.
#[derive(Debug, Clone)]
pub struct WfsClient {
    client: reqwest::Client,
    max_retries: u32,
    page_size: usize,
}

impl WfsClient {
    /// Create a client with the default deadline and retry policy.
    pub fn new() -> Result<Self, IngestError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-attempt deadline.
    pub fn with_timeout(timeout: Duration) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Fetch(format!("client construction failed: {e}")))?;
        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the page size used for paginated fetches.
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// GET a JSON document, retrying transient failures with backoff.
    ///
    /// Returns the parsed body plus one warning per retried attempt.
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<(Value, Vec<String>), IngestError> {
        let mut warnings = Vec::new();
        let mut attempt = 0u32;

        loop {
            match self.try_get_json(url, query).await {
                Ok(value) => return Ok((value, warnings)),
                Err(e) if attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        url = url,
                        attempt = attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "fetch attempt failed, backing off"
                    );
                    warnings.push(format!(
                        "attempt {attempt} against {url} failed ({e}), retrying"
                    ));
                    tokio::time::sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(e) => {
                    return Err(classify_final(e, url, attempt.saturating_add(1)));
                }
            }
        }
    }

    /// Fetch every page of a feature feed, bounded by [`FEATURE_CAP`].
    ///
    /// Pagination uses `startIndex`/`count` query parameters. The cap is
    /// checked before each page is appended; a capped fetch succeeds with
    /// a warning rather than failing.
    pub async fn fetch_features(
        &self,
        url: &str,
        base_query: &[(String, String)],
    ) -> Result<FeatureFetch, IngestError> {
        let mut features: Vec<Value> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut start_index = 0usize;

        loop {
            let mut query = base_query.to_vec();
            query.push((String::from("startIndex"), start_index.to_string()));
            query.push((String::from("count"), self.page_size.to_string()));

            let (body, page_warnings) = self.get_json(url, &query).await?;
            warnings.extend(page_warnings);

            let page: Vec<Value> = body
                .get("features")
                .and_then(Value::as_array)
                .cloned()
                .ok_or_else(|| {
                    IngestError::Parse(format!("{url} response missing features array"))
                })?;
            let page_len = page.len();

            let outcome = paginate::append_page(&mut features, page);
            debug!(
                url = url,
                start_index = start_index,
                page_len = page_len,
                kept = outcome.appended,
                total = features.len(),
                "feature page fetched"
            );

            if outcome.cap_reached {
                warnings.push(format!(
                    "feature cap of {FEATURE_CAP} reached for {url}, remainder dropped"
                ));
                break;
            }
            if page_len < self.page_size {
                break;
            }
            start_index = start_index.saturating_add(page_len);
        }

        Ok(FeatureFetch { features, warnings })
    }

    async fn try_get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, IngestError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IngestError::Timeout {
                        url: url.to_owned(),
                        attempts: 1,
                    }
                } else {
                    IngestError::Fetch(format!("request to {url} failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Fetch(format!("{url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| IngestError::Parse(format!("{url} body was not JSON: {e}")))
    }
}

/// Delay before retry number `attempt` (0-indexed): 250ms, 500ms, 1s, ...
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE.saturating_mul(2u32.saturating_pow(attempt))
}

/// Fold the attempt count into the final error after retries run out.
fn classify_final(error: IngestError, url: &str, attempts: u32) -> IngestError {
    match error {
        IngestError::Timeout { .. } => IngestError::Timeout {
            url: url.to_owned(),
            attempts,
        },
        other => other,
    }
}

pub mod types;

use anyhow::{Context, Result};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Endpoint;
use crate::error::QuoteError;
use crate::model::quote::{Quote, QuoteBatch, QuoteOrigin};

use self::types::extract_field;

pub struct QuoteSource {
    http: reqwest::Client,
    timeout: Duration,
}

impl QuoteSource {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("valuation-gauge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build quote HTTP client")?;
        Ok(Self::with_client(http, timeout_ms))
    }

    pub fn with_client(http: reqwest::Client, timeout_ms: u64) -> Self {
        Self {
            http,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Request every endpoint concurrently and wait for all of them.
    ///
    /// Never fails: if any endpoint errors, times out, or yields an unusable
    /// value, the whole batch is replaced by the configured fallbacks.
    pub async fn fetch(&self, endpoints: &[Endpoint]) -> QuoteBatch {
        let started = Instant::now();
        tracing::debug!(
            endpoints = endpoints.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Fetching quotes"
        );

        let settled = join_all(endpoints.iter().map(|e| self.fetch_endpoint(e))).await;

        let mut quotes = HashMap::new();
        for result in settled {
            match result {
                Ok(fields) => quotes.extend(fields),
                Err(reason) => {
                    tracing::warn!(
                        error = %reason,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Quote fetch failed, using fallback values"
                    );
                    return fallback_batch(endpoints, reason);
                }
            }
        }

        tracing::info!(
            quotes = quotes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Quotes fetched"
        );
        QuoteBatch {
            quotes,
            origin: QuoteOrigin::Live,
        }
    }

    async fn fetch_endpoint(&self, endpoint: &Endpoint) -> Result<Vec<(String, Quote)>, QuoteError> {
        let url = endpoint.url.as_str();
        let http_err = |e: reqwest::Error| {
            if e.is_timeout() {
                QuoteError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                QuoteError::Http {
                    url: url.to_string(),
                    msg: e.to_string(),
                }
            }
        };

        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(http_err)?;

        if !resp.status().is_success() {
            return Err(QuoteError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let text = resp.text().await.map_err(http_err)?;
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| QuoteError::Json {
                url: url.to_string(),
                msg: e.to_string(),
            })?;

        let source = source_name(url);
        endpoint
            .fields
            .iter()
            .map(|field| -> Result<(String, Quote), QuoteError> {
                let value = extract_field(&body, field)?;
                Ok((field.key.clone(), Quote::live(value, source.clone())))
            })
            .collect()
    }
}

/// Convenience wrapper for one-shot callers.
pub async fn fetch_quotes(endpoints: &[Endpoint], timeout_ms: u64) -> QuoteBatch {
    match QuoteSource::new(timeout_ms) {
        Ok(source) => source.fetch(endpoints).await,
        Err(e) => {
            tracing::warn!(error = %e, "Quote client unavailable, using fallback values");
            fallback_batch(
                endpoints,
                QuoteError::Http {
                    url: String::new(),
                    msg: format!("{:#}", e),
                },
            )
        }
    }
}

pub fn fallback_batch(endpoints: &[Endpoint], reason: QuoteError) -> QuoteBatch {
    let quotes = endpoints
        .iter()
        .flat_map(|e| e.fields.iter())
        .map(|f| (f.key.clone(), Quote::fallback(f.fallback)))
        .collect();
    QuoteBatch {
        quotes,
        origin: QuoteOrigin::Fallback { reason },
    }
}

fn source_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

//! Finnhub provider implementation.
//!
//! This module provides data from the Finnhub API:
//! - Company news via the /company-news endpoint
//! - Quarterly EPS history via the /stock/earnings endpoint
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{
    Article, EarningsQuarter, EarningsReport, Sentiment, SourceTier,
};
use crate::provider::{EarningsProvider, NewsProvider};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Per-request budget for Finnhub calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Days of history requested from the company-news endpoint
const NEWS_LOOKBACK_DAYS: i64 = 7;

// ============================================================================
// API Response Structures
// ============================================================================

/// One article from /company-news
#[derive(Debug, Deserialize)]
struct NewsItem {
    /// Publish time (Unix timestamp)
    datetime: Option<i64>,
    /// News headline
    headline: Option<String>,
    /// News source name
    source: Option<String>,
    /// Article summary
    summary: Option<String>,
    /// Article URL
    url: Option<String>,
    // Note: category, id, image, and related fields exist but are not mapped
}

/// One quarter from /stock/earnings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsItem {
    /// Reported EPS
    actual: Option<f64>,
    /// Consensus estimate
    estimate: Option<f64>,
    /// Fiscal quarter (1..4)
    quarter: Option<u32>,
    /// Fiscal year
    year: Option<i32>,
    // Note: period, surprise, and surprisePercent fields exist but are not mapped
}

/// Error envelope from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub news and earnings provider.
///
/// Requires an API key; free tier is limited to 60 calls per minute.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = format!("{}{}", BASE_URL, endpoint);

        let mut request = self.client.get(&url);

        // API key goes in a header rather than the query string
        request = request.header("X-Finnhub-Token", &self.api_key);

        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                ProviderError::Upstream {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        // Quota exhaustion comes back as 403
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(error_msg) = error_resp.error {
                    return Err(ProviderError::Upstream {
                        provider: PROVIDER_ID.to_string(),
                        message: error_msg,
                    });
                }
            }

            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }
}

#[async_trait]
impl NewsProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<Article>, ProviderError> {
        let to = Utc::now();
        let from = to - chrono::Duration::days(NEWS_LOOKBACK_DAYS);
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let params = [("symbol", symbol), ("from", from.as_str()), ("to", to.as_str())];
        let text = self.fetch("/company-news", &params).await?;

        let items: Vec<NewsItem> =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse news response: {}", e),
            })?;

        let articles = items
            .into_iter()
            .filter_map(|item| {
                let headline = item.headline.filter(|h| !h.is_empty())?;
                let summary = item.summary.unwrap_or_default();
                let source = item.source.unwrap_or_else(|| PROVIDER_ID.to_string());
                let published_at = item
                    .datetime
                    .and_then(|t| Utc.timestamp_opt(t, 0).single())?;

                // Finnhub carries no sentiment; classify lexically
                let sentiment = Sentiment::from_text(&headline, &summary);
                let tier = SourceTier::classify(&source);

                Some(Article::new(
                    headline,
                    summary,
                    source,
                    tier,
                    item.url.unwrap_or_default(),
                    published_at,
                    sentiment,
                ))
            })
            .take(limit)
            .collect();

        Ok(articles)
    }
}

#[async_trait]
impl EarningsProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_earnings(
        &self,
        symbol: &str,
        history_quarters: usize,
    ) -> Result<EarningsReport, ProviderError> {
        let params = [("symbol", symbol)];
        let text = self.fetch("/stock/earnings", &params).await?;

        let items: Vec<EarningsItem> =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse earnings response: {}", e),
            })?;

        // Finnhub returns newest first
        let mut outlook = None;
        let mut quarters: Vec<EarningsQuarter> = items
            .into_iter()
            .filter_map(|item| {
                let year = item.year?;
                let quarter = item.quarter?;
                if outlook.is_none() {
                    if let Some(estimate) = item.estimate {
                        outlook = Some(format!("Consensus EPS estimate {:.2}", estimate));
                    }
                }
                let mut record = EarningsQuarter::unknown(format!("Q{}", quarter), year);
                record.eps = item.actual.and_then(Decimal::from_f64);
                Some(record)
            })
            .collect();

        if quarters.is_empty() {
            return Err(ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let latest = quarters.remove(0);
        quarters.truncate(history_quarters);

        Ok(EarningsReport {
            success: true,
            source: PROVIDER_ID.to_string(),
            latest,
            outlook,
            history: quarters,
        })
    }
}

//! Alpha Vantage provider implementation.
//!
//! This module provides data from the Alpha Vantage API:
//! - News with native sentiment via the NEWS_SENTIMENT function
//! - Quarterly EPS history via the EARNINGS function
//!
//! Note: Alpha Vantage free tier is limited to 25 API calls per day.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};
use num_traits::ToPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{Article, EarningsQuarter, EarningsReport, Sentiment, SourceTier};
use crate::provider::{EarningsProvider, NewsProvider};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Per-request budget for Alpha Vantage calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Timestamp layout used by the news feed (e.g. 20260405T133000)
const TIME_PUBLISHED_FORMAT: &str = "%Y%m%dT%H%M%S";

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// NEWS_SENTIMENT response
#[derive(Debug, Deserialize)]
struct NewsSentimentResponse {
    feed: Option<Vec<FeedItem>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: Option<String>,
    url: Option<String>,
    /// Publish time in compact layout (20260405T133000)
    time_published: Option<String>,
    summary: Option<String>,
    source: Option<String>,
    /// Native sentiment score in [-1, 1]
    overall_sentiment_score: Option<f64>,
    // Note: banner_image, topics, and ticker_sentiment fields exist but are not mapped
}

/// EARNINGS response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsResponse {
    quarterly_earnings: Option<Vec<QuarterlyEarning>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuarterlyEarning {
    /// Fiscal quarter end date (YYYY-MM-DD)
    fiscal_date_ending: Option<String>,
    /// Reported EPS as a string ("1.52" or "None")
    #[serde(rename = "reportedEPS")]
    reported_eps: Option<String>,
    // Note: estimatedEPS, surprise, and surprisePercentage fields exist but are not mapped
}

// ============================================================================
// AlphaVantageProvider
// ============================================================================

/// Alpha Vantage news and earnings provider.
///
/// Requires an API key. The free tier quota is tight, so this provider is
/// usually behind Finnhub in the earnings preference order.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a GET request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let mut request = self.client.get(BASE_URL);

        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }
        request = request.query(&[("apikey", self.api_key.as_str())]);

        debug!("Alpha Vantage request with {} params", params.len());

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

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response.text().await.map_err(|e| ProviderError::Upstream {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to read response: {}", e),
        })
    }

    /// Alpha Vantage reports quota exhaustion and bad requests inside a 200
    /// response; surface those before the caller trusts the payload.
    fn check_soft_errors(
        error_message: Option<String>,
        note: Option<String>,
        information: Option<String>,
    ) -> Result<(), ProviderError> {
        if let Some(message) = error_message {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message,
            });
        }

        // A Note or Information payload means the rate limit was hit
        if note.is_some() || information.is_some() {
            warn!("Alpha Vantage returned a rate limit notice");
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(())
    }
}

/// Parse the feed's compact timestamp layout.
fn parse_time_published(value: &str) -> Option<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIME_PUBLISHED_FORMAT)
        .ok()
        .and_then(|naive| Utc.from_local_datetime(&naive).single())
}

/// Parse a string-typed decimal, treating "None" as absent.
fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value).ok()
}

#[async_trait]
impl NewsProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<Article>, ProviderError> {
        let limit_str = limit.to_string();
        let params = [
            ("function", "NEWS_SENTIMENT"),
            ("tickers", symbol),
            ("limit", limit_str.as_str()),
            ("sort", "LATEST"),
        ];
        let text = self.fetch(&params).await?;

        let response: NewsSentimentResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse news response: {}", e),
            })?;

        Self::check_soft_errors(
            response.error_message,
            response.note,
            response.information,
        )?;

        let feed = response.feed.ok_or_else(|| ProviderError::NoData {
            provider: PROVIDER_ID.to_string(),
        })?;

        let articles = feed
            .into_iter()
            .filter_map(|item| {
                let headline = item.title.filter(|t| !t.is_empty())?;
                let summary = item.summary.unwrap_or_default();
                let source = item.source.unwrap_or_else(|| PROVIDER_ID.to_string());
                let published_at = item
                    .time_published
                    .as_deref()
                    .and_then(parse_time_published)?;

                // Native sentiment score, bucketed at the ±0.1 thresholds;
                // fall back to lexical classification when absent
                let sentiment = match item.overall_sentiment_score {
                    Some(score) => Sentiment::from_score(score),
                    None => Sentiment::from_text(&headline, &summary),
                };
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
impl EarningsProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_earnings(
        &self,
        symbol: &str,
        history_quarters: usize,
    ) -> Result<EarningsReport, ProviderError> {
        let params = [("function", "EARNINGS"), ("symbol", symbol)];
        let text = self.fetch(&params).await?;

        let response: EarningsResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse earnings response: {}", e),
            })?;

        Self::check_soft_errors(
            response.error_message,
            response.note,
            response.information,
        )?;

        let quarterly = response
            .quarterly_earnings
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            })?;

        // Newest first; EPS strings like "1.52", or "None" when unreported
        let eps_values: Vec<Option<Decimal>> = quarterly
            .iter()
            .map(|q| q.reported_eps.as_deref().and_then(parse_decimal))
            .collect();

        let mut quarters: Vec<EarningsQuarter> = quarterly
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let date = item.fiscal_date_ending.as_deref()?;
                let (year, quarter) = fiscal_quarter(date)?;
                let mut record = EarningsQuarter::unknown(format!("Q{}", quarter), year);
                record.eps = eps_values.get(index).copied().flatten();
                // Year-over-year growth against the same quarter last year
                record.growth_yoy = match (
                    eps_values.get(index).copied().flatten(),
                    eps_values.get(index + 4).copied().flatten(),
                ) {
                    (Some(current), Some(prior)) if !prior.is_zero() => {
                        ((current - prior) / prior.abs() * Decimal::ONE_HUNDRED).to_f64()
                    }
                    _ => None,
                };
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
            outlook: None,
            history: quarters,
        })
    }
}

/// Split a fiscal date (YYYY-MM-DD) into (year, quarter).
fn fiscal_quarter(date: &str) -> Option<(i32, u32)> {
    let mut parts = date.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, (month - 1) / 3 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiscal_quarter_parsing() {
        assert_eq!(fiscal_quarter("2026-03-31"), Some((2026, 1)));
        assert_eq!(fiscal_quarter("2025-12-31"), Some((2025, 4)));
        assert_eq!(fiscal_quarter("2025-13-31"), None);
        assert_eq!(fiscal_quarter("bogus"), None);
    }

    #[test]
    fn test_parse_time_published() {
        let parsed = parse_time_published("20260405T133000").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2026-04-05 13:30");
        assert!(parse_time_published("not-a-time").is_none());
    }

    #[test]
    fn test_parse_decimal_treats_none_as_absent() {
        assert!(parse_decimal("1.52").is_some());
        assert!(parse_decimal("None").is_none());
    }
}

//! Yahoo Finance provider.
//!
//! Primary quote source for equities, ETFs, and indices; also quotes crypto
//! via `BTC-USD` style symbols. Uses:
//! - The v8 chart endpoint for quotes and chart history (no auth)
//! - The v10 quoteSummary endpoint for profiles (cookie/crumb auth)
//!
//! No API key is required.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::ProviderError;
use crate::models::{AssetKind, CompanyProfile, PricePoint, Quote};
use crate::provider::{ProviderCapabilities, QuoteProvider};

use models::{ChartResponse, QuoteSummaryResponse};

const PROVIDER_ID: &str = "YAHOO";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Per-request budget for Yahoo calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Process-wide cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance provider.
pub struct YahooProvider {
    client: Client,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; marketdeck/0.4)")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Ensure we have a valid authentication crumb, fetching one if the
    /// cache is empty.
    async fn ensure_crumb(&self) -> Result<CrumbData, ProviderError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|e| e.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a fresh cookie from fc.yahoo.com, then a crumb token.
    async fn fetch_crumb(&self) -> Result<CrumbData, ProviderError> {
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| upstream(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
            .ok_or_else(|| upstream("No session cookie in Yahoo response".to_string()))?;

        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(reqwest::header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| upstream(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| upstream(format!("Failed to read crumb: {}", e)))?;

        if crumb.is_empty() || crumb.contains('{') || crumb.contains("Too Many Requests") {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data = CrumbData { cookie, crumb };
        *YAHOO_CRUMB.write().unwrap_or_else(|e| e.into_inner()) = Some(data.clone());
        debug!("Refreshed Yahoo crumb cache");
        Ok(data)
    }

    /// Drop the cached crumb so the next call re-authenticates.
    fn invalidate_crumb() {
        *YAHOO_CRUMB.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Fetch and parse the chart endpoint for a symbol.
    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartResponse, ProviderError> {
        let url = format!(
            "{}/{}?range={}&interval={}",
            CHART_URL,
            encode(symbol),
            range,
            interval
        );

        debug!("Yahoo chart request: {} range={}", symbol, range);

        let response = self.client.get(&url).send().await.map_err(map_transport)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(format!("HTTP {} - {}", status, body)));
        }

        let parsed: ChartResponse = response.json().await.map_err(|e| ProviderError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse chart response: {}", e),
        })?;

        if let Some(error) = parsed.chart.error.as_ref() {
            if error.code.as_deref() == Some("Not Found") {
                return Err(ProviderError::SymbolNotFound(symbol.to_string()));
            }
            return Err(upstream(format!(
                "{}: {}",
                error.code.as_deref().unwrap_or("error"),
                error.description.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(parsed)
    }
}

fn upstream(message: String) -> ProviderError {
    ProviderError::Upstream {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

fn map_transport(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        ProviderError::Upstream {
            provider: PROVIDER_ID.to_string(),
            message: format!("Request failed: {}", error),
        }
    }
}

fn decimal_from(value: f64, field: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_f64(value).ok_or_else(|| ProviderError::Parse {
        provider: PROVIDER_ID.to_string(),
        message: format!("Non-finite value for {}: {}", field, value),
    })
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            asset_kinds: &[
                AssetKind::Stock,
                AssetKind::Etf,
                AssetKind::Index,
                AssetKind::Crypto,
            ],
            supports_history: true,
            supports_profile: true,
        }
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let chart = self.fetch_chart(symbol, "1d", "1d").await?;

        let result = chart
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ProviderError::SymbolNotFound(symbol.to_string()))?;

        let meta = result.meta;
        let price = meta
            .regular_market_price
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            })?;

        let previous_close = meta
            .chart_previous_close
            .or(meta.previous_close)
            .and_then(Decimal::from_f64)
            .filter(|prev| !prev.is_zero());

        let mut quote = Quote::with_change(
            symbol.to_uppercase(),
            meta.short_name.clone(),
            decimal_from(price, "regularMarketPrice")?,
            previous_close,
            meta.currency.clone().unwrap_or_else(|| "USD".to_string()),
            PROVIDER_ID,
            meta.regular_market_time
                .and_then(|t| Utc.timestamp_opt(t, 0).single())
                .unwrap_or_else(Utc::now),
        );
        quote.exchange = meta.exchange_name;
        quote.volume = meta.regular_market_volume.and_then(Decimal::from_f64);

        Ok(quote)
    }

    async fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        // Chart ranges are coarse; pick the smallest covering the request
        let range = match days {
            0..=5 => "5d",
            6..=30 => "1mo",
            31..=90 => "3mo",
            91..=365 => "1y",
            _ => "5y",
        };

        let chart = self.fetch_chart(symbol, range, "1d").await?;

        let result = chart
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            })?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote_block = result
            .indicators
            .and_then(|mut ind| {
                if ind.quote.is_empty() {
                    None
                } else {
                    Some(ind.quote.remove(0))
                }
            })
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            })?;

        let mut points = Vec::with_capacity(timestamps.len());
        for (index, unix) in timestamps.iter().enumerate() {
            let Some(timestamp) = Utc.timestamp_opt(*unix, 0).single() else {
                continue;
            };
            // Gap days come through as nulls; skip them
            let Some(close) = quote_block
                .close
                .get(index)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64)
            else {
                continue;
            };

            let mut point = PricePoint::new(timestamp, close);
            point.open = quote_block
                .open
                .get(index)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64);
            point.high = quote_block
                .high
                .get(index)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64);
            point.low = quote_block
                .low
                .get(index)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64);
            point.volume = quote_block
                .volume
                .get(index)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64);
            points.push(point);
        }

        if points.is_empty() {
            return Err(ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(points)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        let auth = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules=summaryProfile%2CsummaryDetail%2CdefaultKeyStatistics&crumb={}",
            SUMMARY_URL,
            encode(symbol),
            encode(&auth.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::COOKIE, &auth.cookie)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();

        // An expired crumb comes back as 401; drop the cache so the next
        // call re-authenticates
        if status == reqwest::StatusCode::UNAUTHORIZED {
            Self::invalidate_crumb();
            return Err(upstream("Yahoo crumb expired".to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(format!("HTTP {} - {}", status, body)));
        }

        let parsed: QuoteSummaryResponse =
            response.json().await.map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse quoteSummary response: {}", e),
            })?;

        let result = parsed
            .quote_summary
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            })?;

        let mut profile = CompanyProfile::from_source(PROVIDER_ID);

        if let Some(summary) = result.summary_profile {
            profile.sector = summary.sector;
            profile.industry = summary.industry;
        }

        if let Some(detail) = result.summary_detail {
            profile.market_cap = detail.market_cap.and_then(|v| v.raw);
            profile.pe_ratio = detail.trailing_pe.and_then(|v| v.raw);
            profile.dividend_yield = detail.dividend_yield.and_then(|v| v.raw);
            profile.beta = detail.beta.and_then(|v| v.raw);
            profile.week_52_high = detail.fifty_two_week_high.and_then(|v| v.raw);
            profile.week_52_low = detail.fifty_two_week_low.and_then(|v| v.raw);
        }

        if let Some(stats) = result.default_key_statistics {
            profile.eps = stats.trailing_eps.and_then(|v| v.raw);
            profile.profit_margin = stats.profit_margins.and_then(|v| v.raw);
        }

        if profile.market_cap.is_none() && profile.pe_ratio.is_none() && profile.sector.is_none() {
            warn!("Yahoo quoteSummary returned no usable profile for '{}'", symbol);
            return Err(ProviderError::NoData {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(profile)
    }
}

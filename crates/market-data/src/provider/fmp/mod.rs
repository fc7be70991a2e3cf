//! Financial Modeling Prep provider implementation.
//!
//! This module provides data from the FMP API:
//! - Company profiles with valuation ratios via /api/v3/profile
//! - Quarterly income statements as an earnings source via
//!   /api/v3/income-statement
//!
//! FMP is the preferred profile source for the fundamentals synthesizer;
//! quote and history stay with Yahoo, so those trait methods report
//! `NotSupported`.

use std::time::Duration;

use async_trait::async_trait;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{AssetKind, CompanyProfile, EarningsQuarter, EarningsReport, Quote};
use crate::provider::{EarningsProvider, ProviderCapabilities, QuoteProvider};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_ID: &str = "FMP";

/// Per-request budget for FMP calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

// ============================================================================
// API Response Structures
// ============================================================================

/// One company from /profile/{symbol}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileItem {
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    mkt_cap: Option<f64>,
    beta: Option<f64>,
    last_div: Option<f64>,
    price: Option<f64>,
    // Note: ceo, website, image, and exchange fields exist but are not mapped
}

/// One quarter from /income-statement/{symbol}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementItem {
    /// Fiscal period label (Q1..Q4)
    period: Option<String>,
    /// Calendar year as a string
    calendar_year: Option<String>,
    revenue: Option<f64>,
    net_income: Option<f64>,
    eps: Option<f64>,
    // Note: grossProfit, operatingIncome, and date fields exist but are not mapped
}

/// Error envelope from FMP
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_message: Option<String>,
}

// ============================================================================
// FmpProvider
// ============================================================================

/// Financial Modeling Prep profile and earnings provider.
///
/// Requires an API key passed as an `apikey` query parameter.
pub struct FmpProvider {
    client: Client,
    api_key: String,
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a GET request to the FMP API.
    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = format!("{}{}", BASE_URL, path);

        let mut request = self.client.get(&url);
        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }
        request = request.query(&[("apikey", self.api_key.as_str())]);

        debug!("FMP request: {}", path);

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

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(message) = error_resp.error_message {
                    return Err(ProviderError::Upstream {
                        provider: PROVIDER_ID.to_string(),
                        message,
                    });
                }
            }

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
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            asset_kinds: &[AssetKind::Stock, AssetKind::Etf],
            supports_history: false,
            supports_profile: true,
        }
    }

    /// Quotes come from the primary quote provider; FMP only profiles.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let _ = symbol;
        Err(ProviderError::NotSupported {
            operation: "quote".to_string(),
            provider: PROVIDER_ID.to_string(),
        })
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        let text = self.fetch(&format!("/profile/{}", symbol), &[]).await?;

        let items: Vec<ProfileItem> =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse profile response: {}", e),
            })?;

        let item = items.into_iter().next().ok_or_else(|| {
            ProviderError::SymbolNotFound(symbol.to_string())
        })?;

        let mut profile = CompanyProfile::from_source(PROVIDER_ID);
        profile.name = item.company_name;
        profile.sector = item.sector;
        profile.industry = item.industry;
        profile.market_cap = item.mkt_cap;
        profile.beta = item.beta;
        // FMP exposes the trailing dividend as an amount; express it as a
        // yield against the current price
        profile.dividend_yield = match (item.last_div, item.price) {
            (Some(dividend), Some(price)) if price > 0.0 => Some(dividend / price),
            _ => None,
        };

        Ok(profile)
    }
}

#[async_trait]
impl EarningsProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_earnings(
        &self,
        symbol: &str,
        history_quarters: usize,
    ) -> Result<EarningsReport, ProviderError> {
        let limit = (history_quarters + 1).to_string();
        let params = [("period", "quarter"), ("limit", limit.as_str())];
        let text = self
            .fetch(&format!("/income-statement/{}", symbol), &params)
            .await?;

        let items: Vec<IncomeStatementItem> =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse income statement: {}", e),
            })?;

        // Newest first
        let mut quarters: Vec<EarningsQuarter> = items
            .into_iter()
            .filter_map(|item| {
                let period = item.period?;
                let year: i32 = item.calendar_year?.parse().ok()?;
                let mut record = EarningsQuarter::unknown(period, year);
                record.revenue = item.revenue.and_then(Decimal::from_f64);
                record.net_income = item.net_income.and_then(Decimal::from_f64);
                record.eps = item.eps.and_then(Decimal::from_f64);
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

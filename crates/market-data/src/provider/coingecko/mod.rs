//! CoinGecko provider implementation.
//!
//! This module provides crypto data from the CoinGecko API:
//! - Coin metrics (supply, all-time extremes, 30-day change) via /coins/{id}
//! - Market dominance via /global
//! - Price quotes via /coins/{id} market data
//!
//! Coin identifiers come from a fixed symbol table for the majors, falling
//! back to the lowercased symbol. An API key is optional; when present it is
//! sent as the demo-tier header.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::ProviderError;
use crate::models::{CryptoMetrics, Quote};
use crate::provider::CryptoMetricsProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";

/// Per-request budget for CoinGecko calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

lazy_static! {
    /// Fixed symbol -> CoinGecko id mapping for the majors. Anything not
    /// listed falls back to the lowercased symbol.
    static ref COIN_IDS: HashMap<&'static str, &'static str> = [
        ("BTC", "bitcoin"),
        ("ETH", "ethereum"),
        ("SOL", "solana"),
        ("XRP", "ripple"),
        ("ADA", "cardano"),
        ("DOGE", "dogecoin"),
        ("DOT", "polkadot"),
        ("MATIC", "matic-network"),
        ("AVAX", "avalanche-2"),
        ("LINK", "chainlink"),
        ("LTC", "litecoin"),
        ("BNB", "binancecoin"),
        ("UNI", "uniswap"),
        ("ATOM", "cosmos"),
        ("SHIB", "shiba-inu"),
    ]
    .into_iter()
    .collect();
}

/// Resolve a ticker symbol to a CoinGecko coin id.
pub fn coin_id_for(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    COIN_IDS
        .get(upper.as_str())
        .map(|id| (*id).to_string())
        .unwrap_or_else(|| symbol.to_lowercase())
}

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /coins/{id}
#[derive(Debug, Deserialize)]
struct CoinResponse {
    name: Option<String>,
    market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: Option<HashMap<String, f64>>,
    market_cap: Option<HashMap<String, f64>>,
    total_volume: Option<HashMap<String, f64>>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    max_supply: Option<f64>,
    ath: Option<HashMap<String, f64>>,
    atl: Option<HashMap<String, f64>>,
    price_change_24h: Option<f64>,
    price_change_percentage_30d: Option<f64>,
}

/// Response from /global
#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: Option<GlobalData>,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    /// Dominance by lowercased symbol, percent
    market_cap_percentage: Option<HashMap<String, f64>>,
}

// ============================================================================
// CoinGeckoProvider
// ============================================================================

/// CoinGecko crypto metrics and quote provider.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    /// Create a new CoinGecko provider. The API key is optional; without one
    /// the public endpoints are used at their lower rate limit.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a GET request to the CoinGecko API.
    async fn fetch(&self, path: &str) -> Result<String, ProviderError> {
        let url = format!("{}{}", BASE_URL, path);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        debug!("CoinGecko request: {}", path);

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

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NoData {
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

    async fn fetch_coin(&self, symbol: &str) -> Result<CoinResponse, ProviderError> {
        let id = coin_id_for(symbol);
        let path = format!(
            "/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false",
            id
        );
        let text = self.fetch(&path).await?;

        serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse coin response: {}", e),
        })
    }

    /// Fetch market dominance for a symbol from the global endpoint.
    /// Dominance is optional garnish; failures are logged and ignored.
    async fn fetch_dominance(&self, symbol: &str) -> Option<f64> {
        let text = match self.fetch("/global").await {
            Ok(text) => text,
            Err(e) => {
                debug!("CoinGecko global endpoint failed: {}", e);
                return None;
            }
        };

        let parsed: GlobalResponse = serde_json::from_str(&text).ok()?;
        parsed
            .data?
            .market_cap_percentage?
            .get(&symbol.to_lowercase())
            .copied()
    }
}

fn usd(map: &Option<HashMap<String, f64>>) -> Option<f64> {
    map.as_ref().and_then(|m| m.get("usd")).copied()
}

#[async_trait]
impl CryptoMetricsProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_metrics(&self, symbol: &str) -> Result<CryptoMetrics, ProviderError> {
        let coin = self.fetch_coin(symbol).await?;

        let market_data = coin.market_data.ok_or_else(|| ProviderError::NoData {
            provider: PROVIDER_ID.to_string(),
        })?;

        let dominance = self.fetch_dominance(symbol).await;

        Ok(CryptoMetrics {
            source: PROVIDER_ID.to_string(),
            circulating_supply: market_data.circulating_supply.and_then(Decimal::from_f64),
            total_supply: market_data.total_supply.and_then(Decimal::from_f64),
            max_supply: market_data.max_supply.and_then(Decimal::from_f64),
            market_dominance: dominance,
            all_time_high: usd(&market_data.ath).and_then(Decimal::from_f64),
            all_time_low: usd(&market_data.atl).and_then(Decimal::from_f64),
            price_change_30d: market_data.price_change_percentage_30d,
        })
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let coin = self.fetch_coin(symbol).await?;

        let name = coin.name;
        let market_data = coin.market_data.ok_or_else(|| ProviderError::NoData {
            provider: PROVIDER_ID.to_string(),
        })?;

        let price = usd(&market_data.current_price).ok_or_else(|| ProviderError::NoData {
            provider: PROVIDER_ID.to_string(),
        })?;

        let price = Decimal::from_f64(price).ok_or_else(|| ProviderError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Non-finite price for {}", symbol),
        })?;

        // Derive the previous close from the 24h absolute change
        let previous_close = market_data
            .price_change_24h
            .and_then(Decimal::from_f64)
            .map(|change| price - change)
            .filter(|prev| !prev.is_zero());

        if previous_close.is_none() {
            warn!("CoinGecko returned no 24h change for '{}'", symbol);
        }

        let mut quote = Quote::with_change(
            symbol.to_uppercase(),
            name,
            price,
            previous_close,
            "USD",
            PROVIDER_ID,
            Utc::now(),
        );
        quote.market_cap = usd(&market_data.market_cap).and_then(Decimal::from_f64);
        quote.volume = usd(&market_data.total_volume).and_then(Decimal::from_f64);

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_id_for_majors() {
        assert_eq!(coin_id_for("BTC"), "bitcoin");
        assert_eq!(coin_id_for("btc"), "bitcoin");
        assert_eq!(coin_id_for("MATIC"), "matic-network");
    }

    #[test]
    fn test_coin_id_falls_back_to_lowercase() {
        assert_eq!(coin_id_for("PEPE"), "pepe");
        assert_eq!(coin_id_for("NewCoin"), "newcoin");
    }
}

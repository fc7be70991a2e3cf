//! Provider adapter abstractions and implementations.
//!
//! This module contains:
//! - The four capability traits ([`QuoteProvider`], [`NewsProvider`],
//!   [`EarningsProvider`], [`CryptoMetricsProvider`])
//! - One adapter module per upstream source
//!
//! Adapter contract: one attempt per call, no internal retries; every
//! failure is caught and mapped to a [`ProviderError`](crate::errors::ProviderError)
//! naming the provider. Adapters are free-standing; adding or removing one
//! never changes the behavior of another.

pub mod alpha_vantage;
pub mod capabilities;
pub mod coingecko;
pub mod finnhub;
pub mod fmp;
pub mod newsapi;
pub mod yahoo;

pub use capabilities::ProviderCapabilities;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Article, CompanyProfile, CryptoMetrics, EarningsReport, PricePoint, Quote};

/// Capability: fetch quotes, chart history, and (optionally) profiles.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier, a constant like "YAHOO" or "FMP". Used for
    /// logging and source attribution on normalized records.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the latest quote for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;

    /// Fetch chart history covering roughly the last `days` days.
    ///
    /// Default implementation reports `NotSupported`.
    async fn get_history(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let _ = (symbol, days);
        Err(ProviderError::NotSupported {
            operation: "history".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the company profile for a symbol.
    ///
    /// Default implementation reports `NotSupported`.
    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        let _ = symbol;
        Err(ProviderError::NotSupported {
            operation: "profile".to_string(),
            provider: self.id().to_string(),
        })
    }
}

/// Capability: fetch news articles for a symbol.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Unique identifier, a constant like "FINNHUB" or "NEWSAPI".
    fn id(&self) -> &'static str;

    /// Fetch up to `limit` articles for the symbol, normalized and with
    /// per-article sentiment already assigned.
    async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<Article>, ProviderError>;
}

/// Capability: fetch an earnings record for a symbol.
#[async_trait]
pub trait EarningsProvider: Send + Sync {
    /// Unique identifier.
    fn id(&self) -> &'static str;

    /// Fetch the latest quarter plus history for the symbol.
    async fn get_earnings(
        &self,
        symbol: &str,
        history_quarters: usize,
    ) -> Result<EarningsReport, ProviderError>;
}

/// Capability: fetch crypto market metrics for a coin symbol.
#[async_trait]
pub trait CryptoMetricsProvider: Send + Sync {
    /// Unique identifier.
    fn id(&self) -> &'static str;

    /// Fetch supply/dominance/extremum metrics for a coin.
    async fn get_metrics(&self, symbol: &str) -> Result<CryptoMetrics, ProviderError>;

    /// Fetch the latest price quote for a coin.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;
}

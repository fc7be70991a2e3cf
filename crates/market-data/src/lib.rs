//! Marketdeck Market Data Crate
//!
//! Provider adapters and normalized models for the Marketdeck aggregation
//! engine.
//!
//! # Overview
//!
//! This crate supports:
//! - Multiple asset types: equities, ETFs, indices, crypto
//! - Multiple providers: Yahoo Finance, Finnhub, Alpha Vantage, NewsAPI,
//!   Financial Modeling Prep, CoinGecko
//! - Capability-based adapter traits: quotes, news, earnings, crypto metrics
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +-------------------+
//! | Aggregation Core | --> |  Capability trait |  (QuoteProvider, NewsProvider, ...)
//! +------------------+     +-------------------+
//!                                   |
//!                                   v
//!                           +------------------+
//!                           |     Adapter      |  (Yahoo, Finnhub, CoinGecko, ...)
//!                           +------------------+
//!                                   |
//!                                   v
//!                           +------------------+
//!                           | Normalized model |  (Quote, Article, EarningsReport)
//!                           +------------------+
//! ```
//!
//! Every adapter resolves to a normalized record or a
//! [`ProviderError`](errors::ProviderError); it never panics and never lets
//! a transport error escape unattributed. A missing API key means the
//! adapter is simply not constructed; capability degrades, nothing crashes.

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{
    Article, AssetKind, CompanyProfile, CryptoFundamentals, CryptoMetrics, EarningsQuarter,
    EarningsReport, Fundamentals, Impact, NewsCategory, PricePoint, Quote, Sentiment,
    SourceTier, StockFundamentals, ESTIMATED_SOURCE,
};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::fmp::FmpProvider;
pub use provider::newsapi::NewsApiProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{
    CryptoMetricsProvider, EarningsProvider, NewsProvider, ProviderCapabilities, QuoteProvider,
};

// Re-export error types
pub use errors::{Availability, ProviderError};

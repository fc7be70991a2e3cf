//! Snapshot service: the fan-out coordinator and response assembler.
//!
//! Per request, the service runs two concurrent batches:
//! 1. Primary quote + profile. The quote asserts the asset exists and is
//!    priced; its failure is fatal to the request. Profile failure degrades.
//! 2. News fan-out, chart history, earnings chain, and (for crypto) the
//!    metrics lookup, gated on batch 1 succeeding.
//!
//! Both batches are settle-all: every call is independent, bounded by its
//! own timeout, and observed as a per-call outcome. No failure cancels a
//! sibling. Nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use marketdeck_market_data::{
    AlphaVantageProvider, Article, AssetKind, Availability, CoinGeckoProvider, CompanyProfile,
    CryptoMetrics, CryptoMetricsProvider, EarningsProvider, EarningsReport, FinnhubProvider,
    FmpProvider, NewsApiProvider, NewsProvider, PricePoint, ProviderError, Quote, QuoteProvider,
    YahooProvider,
};

use crate::assets::detect_asset_kind;
use crate::earnings::EarningsChain;
use crate::errors::{Error, Result};
use crate::fundamentals::synthesize;
use crate::news::reconcile;
use crate::sentiment;
use crate::settings::Settings;

use super::model::{AssetSnapshot, SnapshotOptions};

/// Source marker on the degraded placeholder path.
const MOCK_FALLBACK_SOURCE: &str = "mock-fallback";

/// Multi-source aggregation service.
///
/// Holds one handle per capability, built once from [`Settings`] and shared
/// across requests. There is no cross-request state beyond these handles.
pub struct SnapshotService {
    quotes: Arc<dyn QuoteProvider>,
    profiles: Option<Arc<dyn QuoteProvider>>,
    news: Vec<Arc<dyn NewsProvider>>,
    earnings: EarningsChain,
    crypto: Option<Arc<dyn CryptoMetricsProvider>>,
    /// Bounds total in-flight upstream calls for this service
    inflight: Arc<Semaphore>,
    settings: Settings,
}

impl SnapshotService {
    /// Build the service with the real provider set. Providers whose
    /// credentials are absent are simply not registered; the capability
    /// degrades and the request path continues without them.
    pub fn from_settings(settings: Settings) -> Self {
        let yahoo: Arc<YahooProvider> = Arc::new(YahooProvider::new());

        let mut news: Vec<Arc<dyn NewsProvider>> = Vec::new();
        let mut earnings: Vec<Arc<dyn EarningsProvider>> = Vec::new();

        // Earnings preference order is a contract: Finnhub, then Alpha
        // Vantage, then FMP.
        if let Some(key) = settings.finnhub_api_key.clone() {
            let finnhub = Arc::new(FinnhubProvider::new(key));
            news.push(finnhub.clone());
            earnings.push(finnhub);
        } else {
            info!("Finnhub key absent; news and earnings will not use Finnhub");
        }

        if let Some(key) = settings.alpha_vantage_api_key.clone() {
            let alpha = Arc::new(AlphaVantageProvider::new(key));
            news.push(alpha.clone());
            earnings.push(alpha);
        } else {
            info!("Alpha Vantage key absent; news and earnings will not use Alpha Vantage");
        }

        if let Some(key) = settings.newsapi_api_key.clone() {
            news.push(Arc::new(NewsApiProvider::new(key)));
        } else {
            info!("NewsAPI key absent; headlines will not use NewsAPI");
        }

        let profiles: Option<Arc<dyn QuoteProvider>> = match settings.fmp_api_key.clone() {
            Some(key) => {
                let fmp = Arc::new(FmpProvider::new(key));
                earnings.push(fmp.clone());
                Some(fmp)
            }
            None => {
                info!("FMP key absent; profiles fall back to the quote provider");
                Some(yahoo.clone())
            }
        };

        let crypto: Option<Arc<dyn CryptoMetricsProvider>> = Some(Arc::new(
            CoinGeckoProvider::new(settings.coingecko_api_key.clone()),
        ));

        let inflight = Arc::new(Semaphore::new(settings.max_inflight_requests));

        Self {
            quotes: yahoo,
            profiles,
            news,
            earnings: EarningsChain::new(earnings),
            crypto,
            inflight,
            settings,
        }
    }

    /// Build the service from explicit provider handles. Used by tests and
    /// by callers that wire their own adapters.
    pub fn with_providers(
        quotes: Arc<dyn QuoteProvider>,
        profiles: Option<Arc<dyn QuoteProvider>>,
        news: Vec<Arc<dyn NewsProvider>>,
        earnings: EarningsChain,
        crypto: Option<Arc<dyn CryptoMetricsProvider>>,
        settings: Settings,
    ) -> Self {
        let inflight = Arc::new(Semaphore::new(settings.max_inflight_requests));
        Self {
            quotes,
            profiles,
            news,
            earnings,
            crypto,
            inflight,
            settings,
        }
    }

    /// Assemble the full snapshot for one symbol.
    ///
    /// Fails only on an empty symbol or a primary-quote failure; every other
    /// data source degrades to an explicit absent/estimated value.
    pub async fn snapshot(
        &self,
        symbol: &str,
        options: &SnapshotOptions,
    ) -> Result<AssetSnapshot> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(Error::InvalidSymbol(
                "symbol must not be empty".to_string(),
            ));
        }

        let kind = detect_asset_kind(&symbol);
        debug!("Building snapshot for '{}' ({})", symbol, kind);

        // Batch 1: primary quote + profile, concurrently, each on its own
        // timeout. The profile is garnish; the quote is identity.
        let (quote_outcome, profile_outcome) = tokio::join!(
            self.fetch_primary_quote(&symbol, kind),
            self.fetch_profile(&symbol, kind),
        );

        let quote = match quote_outcome {
            Ok(quote) => quote,
            Err(source) => {
                return Err(Error::PrimaryQuoteFailed { symbol, source });
            }
        };

        let profile = match profile_outcome {
            Ok(profile) => profile,
            Err(e) => {
                log_degraded("profile", &symbol, &e);
                None
            }
        };

        // Batch 2: news fan-out, history, earnings, crypto metrics. Gated on
        // the quote because there is nothing to serve without it.
        let (articles, history, earnings, metrics) = tokio::join!(
            self.fetch_all_news(&symbol),
            self.fetch_history(&symbol, kind),
            self.fetch_earnings(&symbol, kind),
            self.fetch_crypto_metrics(&symbol, kind),
        );

        let history = match history {
            Ok(points) => points,
            Err(e) => {
                log_degraded("history", &symbol, &e);
                Vec::new()
            }
        };

        let cap = options
            .article_limit
            .map(|limit| limit.min(self.settings.max_articles))
            .unwrap_or(self.settings.max_articles);

        let articles = filter_sources(articles, options.news_sources.as_deref());
        let news = reconcile(articles, &symbol, cap);
        let sentiment = sentiment::aggregate(&news);
        let fundamentals = synthesize(kind, &quote, profile.as_ref(), metrics);

        Ok(AssetSnapshot {
            symbol,
            kind,
            quote,
            fundamentals,
            news,
            sentiment,
            earnings,
            history,
            as_of: Utc::now(),
        })
    }

    /// Degraded auxiliary entry point: on a primary-quote failure, serve a
    /// clearly-labeled placeholder (`source: "mock-fallback"`) instead of an
    /// error. Consumers can always tell placeholder data from real data by
    /// that marker. Invalid symbols still fail.
    pub async fn snapshot_or_placeholder(
        &self,
        symbol: &str,
        options: &SnapshotOptions,
    ) -> Result<AssetSnapshot> {
        match self.snapshot(symbol, options).await {
            Ok(snapshot) => Ok(snapshot),
            Err(Error::PrimaryQuoteFailed { symbol, source }) => {
                warn!(
                    "Serving placeholder snapshot for '{}' after quote failure: {}",
                    symbol, source
                );
                Ok(self.placeholder_snapshot(symbol))
            }
            Err(e) => Err(e),
        }
    }

    fn placeholder_snapshot(&self, symbol: String) -> AssetSnapshot {
        let kind = detect_asset_kind(&symbol);
        let quote = Quote::with_change(
            symbol.clone(),
            None,
            Decimal::ZERO,
            None,
            "USD",
            MOCK_FALLBACK_SOURCE,
            Utc::now(),
        );
        let fundamentals = synthesize(kind, &quote, None, None);

        AssetSnapshot {
            symbol,
            kind,
            quote,
            fundamentals,
            news: Vec::new(),
            sentiment: sentiment::aggregate(&[]),
            earnings: EarningsReport::estimated(self.settings.earnings_history_quarters),
            history: Vec::new(),
            as_of: Utc::now(),
        }
    }

    // ========================================================================
    // Per-capability fetches
    // ========================================================================

    async fn fetch_primary_quote(
        &self,
        symbol: &str,
        kind: AssetKind,
    ) -> std::result::Result<Quote, ProviderError> {
        // Crypto quotes come from the crypto price service when configured
        if kind == AssetKind::Crypto {
            if let Some(crypto) = &self.crypto {
                return self
                    .limited(self.settings.quote_timeout, crypto.id(), crypto.get_quote(symbol))
                    .await;
            }
        }

        let symbol = provider_symbol(symbol, kind);
        self.limited(
            self.settings.quote_timeout,
            self.quotes.id(),
            self.quotes.get_quote(&symbol),
        )
        .await
    }

    async fn fetch_profile(
        &self,
        symbol: &str,
        kind: AssetKind,
    ) -> std::result::Result<Option<CompanyProfile>, ProviderError> {
        // Crypto fundamentals come from the metrics path, not a profile
        if kind == AssetKind::Crypto {
            return Ok(None);
        }

        let Some(profiles) = &self.profiles else {
            return Ok(None);
        };

        let caps = profiles.capabilities();
        if !caps.supports_profile || !caps.supports_kind(kind) {
            return Ok(None);
        }

        self.limited(
            self.settings.profile_timeout,
            profiles.id(),
            profiles.get_profile(symbol),
        )
        .await
        .map(Some)
    }

    /// Fan out to every configured news provider concurrently and collect
    /// each outcome independently. A failed provider contributes nothing;
    /// it never aborts the others.
    async fn fetch_all_news(&self, symbol: &str) -> Vec<Article> {
        let limit = self.settings.per_provider_news_limit;

        let fetches = self.news.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move {
                let outcome = self
                    .limited(
                        self.settings.news_timeout,
                        provider.id(),
                        provider.get_news(symbol, limit),
                    )
                    .await;
                (provider.id(), outcome)
            }
        });

        let outcomes = join_all(fetches).await;

        let mut merged = Vec::new();
        for (provider_id, outcome) in outcomes {
            match outcome {
                Ok(articles) => {
                    debug!(
                        "News provider '{}' returned {} article(s) for '{}'",
                        provider_id,
                        articles.len(),
                        symbol
                    );
                    merged.extend(articles);
                }
                Err(e) => log_degraded(provider_id, symbol, &e),
            }
        }

        merged
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        kind: AssetKind,
    ) -> std::result::Result<Vec<PricePoint>, ProviderError> {
        if !self.quotes.capabilities().supports_history {
            return Ok(Vec::new());
        }

        let symbol = provider_symbol(symbol, kind);
        self.limited(
            self.settings.history_timeout,
            self.quotes.id(),
            self.quotes.get_history(&symbol, self.settings.history_days),
        )
        .await
    }

    async fn fetch_earnings(
        &self,
        symbol: &str,
        kind: AssetKind,
    ) -> EarningsReport {
        // No earnings exist for crypto; go straight to the estimated record
        if kind == AssetKind::Crypto {
            return EarningsReport::estimated(self.settings.earnings_history_quarters);
        }

        self.earnings
            .fetch(symbol, self.settings.earnings_history_quarters)
            .await
    }

    async fn fetch_crypto_metrics(&self, symbol: &str, kind: AssetKind) -> Option<CryptoMetrics> {
        if kind != AssetKind::Crypto {
            return None;
        }

        let crypto = self.crypto.as_ref()?;
        match self
            .limited(
                self.settings.crypto_timeout,
                crypto.id(),
                crypto.get_metrics(symbol),
            )
            .await
        {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                // The synthesizer degrades to the static default table
                log_degraded(crypto.id(), symbol, &e);
                None
            }
        }
    }

    /// Run one upstream call under the in-flight bound and its timeout.
    /// A fired timeout is indistinguishable from any other failed call.
    async fn limited<T, F>(
        &self,
        budget: Duration,
        provider: &str,
        fut: F,
    ) -> std::result::Result<T, ProviderError>
    where
        F: Future<Output = std::result::Result<T, ProviderError>>,
    {
        // The semaphore is never closed while the service is alive
        let _permit = self.inflight.acquire().await.ok();

        match tokio::time::timeout(budget, fut).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderError::Timeout {
                provider: provider.to_string(),
            }),
        }
    }
}

/// Symbol as the quote provider expects it: crypto goes through the pair
/// notation, everything else is passed through uppercased.
fn provider_symbol(symbol: &str, kind: AssetKind) -> String {
    match kind {
        AssetKind::Crypto => format!("{}-USD", symbol),
        _ => symbol.to_string(),
    }
}

/// Keep only articles from the requested sources, when a filter was given.
fn filter_sources(articles: Vec<Article>, sources: Option<&[String]>) -> Vec<Article> {
    let Some(sources) = sources else {
        return articles;
    };
    if sources.is_empty() {
        return articles;
    }

    let wanted: Vec<String> = sources.iter().map(|s| s.to_lowercase()).collect();
    articles
        .into_iter()
        .filter(|article| wanted.contains(&article.source.to_lowercase()))
        .collect()
}

/// Log a degraded capability at the level its classification calls for.
fn log_degraded(what: &str, symbol: &str, error: &ProviderError) {
    match error.availability() {
        Availability::Unavailable => {
            info!("'{}' unavailable for '{}': {}", what, symbol, error);
        }
        _ => {
            warn!("'{}' failed for '{}': {}", what, symbol, error);
        }
    }
}


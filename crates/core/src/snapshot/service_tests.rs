//! Tests for the snapshot service contracts.
//!
//! These cover the coordinator's failure model:
//!
//! 1. Settle-all fan-out: one surviving news provider is enough
//! 2. Primary-quote failure is fatal and names the symbol
//! 3. Profile/history/metrics failures degrade in place
//! 4. The placeholder path is clearly marked, never silently blended

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use marketdeck_market_data::{
        Article, AssetKind, CompanyProfile, CryptoMetrics, CryptoMetricsProvider, PricePoint,
        ProviderCapabilities, ProviderError, Quote, QuoteProvider, Sentiment, SourceTier,
    };

    use crate::earnings::EarningsChain;
    use crate::errors::Error;
    use crate::settings::Settings;
    use crate::snapshot::{SnapshotOptions, SnapshotService};

    // =========================================================================
    // Fakes
    // =========================================================================

    struct FakeQuotes {
        quote_ok: bool,
        profile_ok: bool,
    }

    impl FakeQuotes {
        fn healthy() -> Self {
            Self {
                quote_ok: true,
                profile_ok: true,
            }
        }

        fn quote_down() -> Self {
            Self {
                quote_ok: false,
                profile_ok: true,
            }
        }

        fn profile_down() -> Self {
            Self {
                quote_ok: true,
                profile_ok: false,
            }
        }
    }

    fn test_quote(symbol: &str) -> Quote {
        Quote::with_change(
            symbol,
            Some("Test Asset".to_string()),
            dec!(150.00),
            Some(dec!(148.00)),
            "USD",
            "FAKE_QUOTES",
            Utc::now(),
        )
    }

    #[async_trait]
    impl QuoteProvider for FakeQuotes {
        fn id(&self) -> &'static str {
            "FAKE_QUOTES"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                asset_kinds: &[AssetKind::Stock, AssetKind::Etf, AssetKind::Index],
                supports_history: true,
                supports_profile: true,
            }
        }

        async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
            if self.quote_ok {
                Ok(test_quote(symbol))
            } else {
                Err(ProviderError::Upstream {
                    provider: "FAKE_QUOTES".to_string(),
                    message: "upstream down".to_string(),
                })
            }
        }

        async fn get_history(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<PricePoint>, ProviderError> {
            Ok(vec![PricePoint::new(Utc::now(), dec!(149.00))])
        }

        async fn get_profile(&self, _symbol: &str) -> Result<CompanyProfile, ProviderError> {
            if self.profile_ok {
                let mut profile = CompanyProfile::from_source("FAKE_QUOTES");
                profile.pe_ratio = Some(25.0);
                Ok(profile)
            } else {
                Err(ProviderError::Timeout {
                    provider: "FAKE_QUOTES".to_string(),
                })
            }
        }
    }

    struct FakeNews {
        id: &'static str,
        articles: Vec<Article>,
        fail: bool,
    }

    impl FakeNews {
        fn returning(id: &'static str, headlines: &[&str]) -> Arc<Self> {
            let articles = headlines
                .iter()
                .map(|headline| {
                    Article::new(
                        *headline,
                        "",
                        "Test Source",
                        SourceTier::Tier2,
                        "https://example.com",
                        Utc::now(),
                        Sentiment::Positive,
                    )
                })
                .collect();
            Arc::new(Self {
                id,
                articles,
                fail: false,
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                articles: vec![],
                fail: true,
            })
        }
    }

    #[async_trait]
    impl marketdeck_market_data::NewsProvider for FakeNews {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn get_news(
            &self,
            _symbol: &str,
            _limit: usize,
        ) -> Result<Vec<Article>, ProviderError> {
            if self.fail {
                Err(ProviderError::Upstream {
                    provider: self.id.to_string(),
                    message: "boom".to_string(),
                })
            } else {
                Ok(self.articles.clone())
            }
        }
    }

    struct FakeCrypto {
        metrics_ok: bool,
    }

    #[async_trait]
    impl CryptoMetricsProvider for FakeCrypto {
        fn id(&self) -> &'static str {
            "FAKE_CRYPTO"
        }

        async fn get_metrics(&self, _symbol: &str) -> Result<CryptoMetrics, ProviderError> {
            if self.metrics_ok {
                Ok(CryptoMetrics {
                    source: "FAKE_CRYPTO".to_string(),
                    circulating_supply: Some(Decimal::from(19_700_000)),
                    market_dominance: Some(51.0),
                    ..Default::default()
                })
            } else {
                Err(ProviderError::Timeout {
                    provider: "FAKE_CRYPTO".to_string(),
                })
            }
        }

        async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
            Ok(Quote::with_change(
                symbol,
                Some("Bitcoin".to_string()),
                dec!(64000.00),
                Some(dec!(63000.00)),
                "USD",
                "FAKE_CRYPTO",
                Utc::now(),
            ))
        }
    }

    fn service(
        quotes: FakeQuotes,
        news: Vec<Arc<FakeNews>>,
        crypto: Option<FakeCrypto>,
    ) -> SnapshotService {
        let news = news
            .into_iter()
            .map(|n| n as Arc<dyn marketdeck_market_data::NewsProvider>)
            .collect();
        let quotes = Arc::new(quotes);
        SnapshotService::with_providers(
            quotes.clone(),
            Some(quotes),
            news,
            EarningsChain::new(vec![]),
            crypto.map(|c| Arc::new(c) as Arc<dyn CryptoMetricsProvider>),
            Settings::default(),
        )
    }

    // =========================================================================
    // Fan-out contract
    // =========================================================================

    #[tokio::test]
    async fn test_one_surviving_news_provider_is_enough() {
        let survivor = FakeNews::returning(
            "SURVIVOR",
            &[
                "First distinct headline about results",
                "Second distinct headline about outlook",
                "Third distinct headline about products",
                "Fourth distinct headline about hiring",
                "Fifth distinct headline about expansion",
            ],
        );
        let service = service(
            FakeQuotes::healthy(),
            vec![
                FakeNews::failing("DOWN_ONE"),
                FakeNews::failing("DOWN_TWO"),
                FakeNews::failing("DOWN_THREE"),
                survivor,
            ],
            None,
        );

        let snapshot = service
            .snapshot("AAPL", &SnapshotOptions::default())
            .await
            .expect("snapshot should succeed");

        assert_eq!(snapshot.news.len(), 5);
        assert_eq!(snapshot.sentiment.positive, 5);
    }

    #[tokio::test]
    async fn test_all_news_providers_failing_yields_empty_list() {
        let service = service(
            FakeQuotes::healthy(),
            vec![FakeNews::failing("DOWN_ONE"), FakeNews::failing("DOWN_TWO")],
            None,
        );

        let snapshot = service
            .snapshot("AAPL", &SnapshotOptions::default())
            .await
            .expect("snapshot should succeed without news");

        assert!(snapshot.news.is_empty());
        assert_eq!(snapshot.sentiment.score, 0.0);
        assert_eq!(snapshot.sentiment.overall, Sentiment::Neutral);
    }

    // =========================================================================
    // Primary-quote failure
    // =========================================================================

    #[tokio::test]
    async fn test_primary_quote_failure_is_fatal_and_names_symbol() {
        let service = service(FakeQuotes::quote_down(), vec![], None);

        let result = service.snapshot("AAPL", &SnapshotOptions::default()).await;
        let error = result.expect_err("quote failure must fail the request");

        match error {
            Error::PrimaryQuoteFailed { symbol, .. } => assert_eq!(symbol, "AAPL"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_symbol_is_rejected() {
        let service = service(FakeQuotes::healthy(), vec![], None);

        let result = service.snapshot("   ", &SnapshotOptions::default()).await;
        assert!(matches!(result, Err(Error::InvalidSymbol(_))));
    }

    // =========================================================================
    // Degradation
    // =========================================================================

    #[tokio::test]
    async fn test_profile_failure_degrades_to_estimated_fundamentals() {
        let service = service(FakeQuotes::profile_down(), vec![], None);

        let snapshot = service
            .snapshot("AAPL", &SnapshotOptions::default())
            .await
            .expect("profile failure must not fail the request");

        assert!(snapshot.fundamentals.is_estimated());
    }

    #[tokio::test]
    async fn test_empty_earnings_chain_yields_estimated_record() {
        let service = service(FakeQuotes::healthy(), vec![], None);

        let snapshot = service
            .snapshot("AAPL", &SnapshotOptions::default())
            .await
            .expect("snapshot should succeed");

        assert!(snapshot.earnings.success);
        assert_eq!(snapshot.earnings.source, "Estimated");
        assert_eq!(snapshot.earnings.history.len(), 4);
    }

    #[tokio::test]
    async fn test_crypto_metrics_failure_falls_back_to_defaults() {
        let service = service(
            FakeQuotes::healthy(),
            vec![],
            Some(FakeCrypto { metrics_ok: false }),
        );

        let snapshot = service
            .snapshot("BTC", &SnapshotOptions::default())
            .await
            .expect("metrics failure must not fail the request");

        assert_eq!(snapshot.kind, AssetKind::Crypto);
        assert_eq!(snapshot.quote.source, "FAKE_CRYPTO");
        assert!(snapshot.fundamentals.is_estimated());
        assert_eq!(snapshot.fundamentals.source(), "defaults");
    }

    #[tokio::test]
    async fn test_crypto_metrics_success_is_authoritative() {
        let service = service(
            FakeQuotes::healthy(),
            vec![],
            Some(FakeCrypto { metrics_ok: true }),
        );

        let snapshot = service
            .snapshot("btc", &SnapshotOptions::default())
            .await
            .expect("snapshot should succeed");

        assert_eq!(snapshot.symbol, "BTC");
        assert!(!snapshot.fundamentals.is_estimated());
        assert_eq!(snapshot.fundamentals.source(), "FAKE_CRYPTO");
    }

    // =========================================================================
    // Options
    // =========================================================================

    #[tokio::test]
    async fn test_article_limit_option_caps_results() {
        let headlines: Vec<String> = (0..10)
            .map(|i| format!("Completely distinct headline number {}", i))
            .collect();
        let refs: Vec<&str> = headlines.iter().map(String::as_str).collect();
        let service = service(
            FakeQuotes::healthy(),
            vec![FakeNews::returning("ONLY", &refs)],
            None,
        );

        let options = SnapshotOptions {
            article_limit: Some(3),
            news_sources: None,
        };
        let snapshot = service
            .snapshot("AAPL", &options)
            .await
            .expect("snapshot should succeed");

        assert_eq!(snapshot.news.len(), 3);
    }

    #[tokio::test]
    async fn test_source_filter_drops_other_sources() {
        let service = service(
            FakeQuotes::healthy(),
            vec![FakeNews::returning(
                "ONLY",
                &["A headline from the test source"],
            )],
            None,
        );

        let options = SnapshotOptions {
            article_limit: None,
            news_sources: Some(vec!["some other outlet".to_string()]),
        };
        let snapshot = service
            .snapshot("AAPL", &options)
            .await
            .expect("snapshot should succeed");

        assert!(snapshot.news.is_empty());
    }

    // =========================================================================
    // Placeholder path
    // =========================================================================

    #[tokio::test]
    async fn test_placeholder_snapshot_is_clearly_marked() {
        let service = service(FakeQuotes::quote_down(), vec![], None);

        let snapshot = service
            .snapshot_or_placeholder("AAPL", &SnapshotOptions::default())
            .await
            .expect("placeholder path must not error");

        assert_eq!(snapshot.quote.source, "mock-fallback");
        assert_eq!(snapshot.quote.price, Decimal::ZERO);
        assert!(snapshot.news.is_empty());
    }

    #[tokio::test]
    async fn test_placeholder_path_passes_real_data_through() {
        let service = service(FakeQuotes::healthy(), vec![], None);

        let snapshot = service
            .snapshot_or_placeholder("AAPL", &SnapshotOptions::default())
            .await
            .expect("snapshot should succeed");

        assert_eq!(snapshot.quote.source, "FAKE_QUOTES");
    }
}

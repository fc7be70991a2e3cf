//! Earnings fallback chain.
//!
//! Earnings providers are tried in a fixed preference order; the first
//! success wins and short-circuits the rest. The ordering is a contract;
//! providers are never raced. When every provider fails, a clearly-marked
//! estimated record is substituted so the chain itself never fails.

use std::sync::Arc;

use log::{info, warn};

use marketdeck_market_data::{Availability, EarningsProvider, EarningsReport};

/// Ordered first-successful-wins chain over earnings providers.
pub struct EarningsChain {
    providers: Vec<Arc<dyn EarningsProvider>>,
}

impl EarningsChain {
    /// Build a chain from an ordered provider list. Preference runs front to
    /// back.
    pub fn new(providers: Vec<Arc<dyn EarningsProvider>>) -> Self {
        Self { providers }
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether any provider is configured.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Fetch earnings, trying each provider once in order. On total failure
    /// the estimated record is returned: success flag set, source marked
    /// `"Estimated"`, metrics left as explicit unknowns.
    pub async fn fetch(&self, symbol: &str, history_quarters: usize) -> EarningsReport {
        for provider in &self.providers {
            match provider.get_earnings(symbol, history_quarters).await {
                Ok(report) => {
                    info!(
                        "Earnings for '{}' served by provider '{}'",
                        symbol,
                        provider.id()
                    );
                    return report;
                }
                Err(e) => match e.availability() {
                    Availability::Unavailable => {
                        info!(
                            "Earnings provider '{}' unavailable for '{}': {}",
                            provider.id(),
                            symbol,
                            e
                        );
                    }
                    _ => {
                        warn!(
                            "Earnings provider '{}' failed for '{}': {}. Trying next.",
                            provider.id(),
                            symbol,
                            e
                        );
                    }
                },
            }
        }

        info!(
            "All earnings providers failed for '{}'; substituting estimated record",
            symbol
        );
        EarningsReport::estimated(history_quarters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marketdeck_market_data::{EarningsQuarter, ProviderError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEarnings {
        id: &'static str,
        calls: AtomicUsize,
        result: Option<EarningsReport>,
    }

    impl FakeEarnings {
        fn succeeding(id: &'static str) -> Self {
            Self {
                id,
                calls: AtomicUsize::new(0),
                result: Some(EarningsReport {
                    success: true,
                    source: id.to_string(),
                    latest: EarningsQuarter::unknown("Q2", 2026),
                    outlook: None,
                    history: vec![],
                }),
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                id,
                calls: AtomicUsize::new(0),
                result: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EarningsProvider for FakeEarnings {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn get_earnings(
            &self,
            _symbol: &str,
            _history_quarters: usize,
        ) -> Result<EarningsReport, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Some(report) => Ok(report.clone()),
                None => Err(ProviderError::Upstream {
                    provider: self.id.to_string(),
                    message: "boom".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Arc::new(FakeEarnings::succeeding("FIRST"));
        let second = Arc::new(FakeEarnings::succeeding("SECOND"));
        let chain = EarningsChain::new(vec![first.clone(), second.clone()]);

        let report = chain.fetch("AAPL", 4).await;
        assert_eq!(report.source, "FIRST");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_moves_down_the_order() {
        let first = Arc::new(FakeEarnings::failing("FIRST"));
        let second = Arc::new(FakeEarnings::succeeding("SECOND"));
        let chain = EarningsChain::new(vec![first.clone(), second.clone()]);

        let report = chain.fetch("AAPL", 4).await;
        assert_eq!(report.source, "SECOND");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_yields_estimated_record() {
        let first = Arc::new(FakeEarnings::failing("FIRST"));
        let second = Arc::new(FakeEarnings::failing("SECOND"));
        let chain = EarningsChain::new(vec![first, second]);

        let report = chain.fetch("AAPL", 4).await;
        assert!(report.success);
        assert_eq!(report.source, "Estimated");
        assert!(report.is_estimated());
        assert_eq!(report.history.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_chain_yields_estimated_record() {
        let chain = EarningsChain::new(vec![]);
        let report = chain.fetch("AAPL", 4).await;
        assert_eq!(report.source, "Estimated");
    }

    #[tokio::test]
    async fn test_providers_tried_once_each() {
        let only = Arc::new(FakeEarnings::failing("ONLY"));
        let chain = EarningsChain::new(vec![only.clone()]);

        let _ = chain.fetch("AAPL", 4).await;
        assert_eq!(only.call_count(), 1);
    }
}

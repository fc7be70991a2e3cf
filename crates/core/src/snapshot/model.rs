use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketdeck_market_data::{Article, AssetKind, EarningsReport, Fundamentals, PricePoint, Quote};

use crate::sentiment::SentimentSummary;

/// Options carried in from the inbound request.
#[derive(Clone, Debug, Default)]
pub struct SnapshotOptions {
    /// Override for the article cap (bounded by the configured maximum)
    pub article_limit: Option<usize>,

    /// Restrict news to these source names (case-insensitive)
    pub news_sources: Option<Vec<String>>,
}

/// The single outbound shape: everything the dashboard needs for one asset,
/// assembled per request and never cached.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSnapshot {
    pub symbol: String,

    pub kind: AssetKind,

    pub quote: Quote,

    /// Tagged union: exactly one variant per asset class
    pub fundamentals: Fundamentals,

    /// Deduplicated, ranked, capped article list
    pub news: Vec<Article>,

    pub sentiment: SentimentSummary,

    pub earnings: EarningsReport,

    pub history: Vec<PricePoint>,

    /// When the snapshot was assembled
    pub as_of: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketdeck_market_data::{EarningsReport, Fundamentals, StockFundamentals};
    use rust_decimal_macros::dec;

    use crate::sentiment::SentimentSummary;

    #[test]
    fn test_snapshot_wire_shape() {
        let quote = Quote::with_change(
            "AAPL",
            Some("Apple Inc.".to_string()),
            dec!(150.00),
            Some(dec!(148.00)),
            "USD",
            "YAHOO",
            Utc::now(),
        );

        let snapshot = AssetSnapshot {
            symbol: "AAPL".to_string(),
            kind: AssetKind::Stock,
            quote,
            fundamentals: Fundamentals::Stock(StockFundamentals {
                pe_ratio: Some(24.5),
                source: "FMP".to_string(),
                is_estimated: false,
                ..Default::default()
            }),
            news: vec![],
            sentiment: SentimentSummary::empty(),
            earnings: EarningsReport::estimated(4),
            history: vec![],
            as_of: Utc::now(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["kind"], "stock");
        assert_eq!(json["fundamentals"]["assetType"], "stock");
        assert_eq!(json["fundamentals"]["peRatio"], 24.5);
        assert!(json["quote"]["changePercent"].is_number());
        assert_eq!(json["earnings"]["source"], "Estimated");
        assert_eq!(json["sentiment"]["overall"], "neutral");
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized crypto metrics from a metrics-capable provider.
///
/// Feeds the crypto fundamentals variant; every field is optional because
/// coverage varies by coin.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoMetrics {
    /// Provider that supplied the metrics
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<Decimal>,

    /// Share of total crypto market capitalization, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_dominance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_time_high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_time_low: Option<Decimal>,

    /// 30-day price change, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_30d: Option<f64>,
}

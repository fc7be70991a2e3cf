use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fundamentals record, tagged by asset class. Exactly one variant is
/// populated per response; the tag tells consumers which fields apply.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "assetType", rename_all = "camelCase")]
pub enum Fundamentals {
    Stock(StockFundamentals),
    Crypto(CryptoFundamentals),
}

impl Fundamentals {
    /// Provider attribution for the record.
    pub fn source(&self) -> &str {
        match self {
            Self::Stock(stock) => &stock.source,
            Self::Crypto(crypto) => &crypto.source,
        }
    }

    /// Whether any field was back-filled rather than provider-sourced.
    pub fn is_estimated(&self) -> bool {
        match self {
            Self::Stock(stock) => stock.is_estimated,
            Self::Crypto(crypto) => crypto.is_estimated,
        }
    }
}

/// Equity fundamentals. Metrics with no integrated authoritative source stay
/// `None`: an explicit unknown, never a fabricated number.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFundamentals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Where the sourced fields came from ("FMP", "quote", "none")
    pub source: String,

    /// True when any gap was back-filled instead of provider-sourced
    pub is_estimated: bool,
}

/// Crypto fundamentals. Volatility, whale activity, and network health have
/// no provider source and stay `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoFundamentals {
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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whale_activity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_health: Option<f64>,

    /// Where the sourced fields came from ("COINGECKO", "defaults")
    pub source: String,

    /// True when the metrics lookup failed and defaults were substituted
    pub is_estimated: bool,
}

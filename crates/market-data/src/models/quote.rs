use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest quote for an asset, normalized across providers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Uppercased request symbol
    pub symbol: String,

    /// Display name, when the provider supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Current/last traded price
    pub price: Decimal,

    /// Previous session close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Absolute change versus previous close; missing when previous close is
    /// absent or zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,

    /// Percent change versus previous close; missing when previous close is
    /// absent or zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,

    /// Trading volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    /// Market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,

    /// Quote currency
    pub currency: String,

    /// Exchange name or code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Provider that supplied the quote (YAHOO, COINGECKO, "mock-fallback")
    pub source: String,

    /// When the quote was observed
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Create a quote, deriving `change` and `change_percent` from the
    /// previous close. A zero or absent previous close leaves both unset
    /// rather than dividing by zero.
    pub fn with_change(
        symbol: impl Into<String>,
        name: Option<String>,
        price: Decimal,
        previous_close: Option<Decimal>,
        currency: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (change, change_percent) = match previous_close {
            Some(prev) if !prev.is_zero() => {
                let change = price - prev;
                let percent = (change / prev * Decimal::ONE_HUNDRED)
                    .to_f64()
                    .unwrap_or(0.0);
                (Some(change), Some(percent))
            }
            _ => (None, None),
        };

        Self {
            symbol: symbol.into(),
            name,
            price,
            previous_close,
            change,
            change_percent,
            volume: None,
            market_cap: None,
            currency: currency.into(),
            exchange: None,
            source: source.into(),
            timestamp,
        }
    }
}

/// One point of chart history.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    pub close: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl PricePoint {
    /// Create a close-only point.
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_change_derived_from_previous_close() {
        let quote = Quote::with_change(
            "AAPL",
            Some("Apple Inc.".to_string()),
            dec!(110.00),
            Some(dec!(100.00)),
            "USD",
            "YAHOO",
            Utc::now(),
        );
        assert_eq!(quote.change, Some(dec!(10.00)));
        let percent = quote.change_percent.unwrap();
        assert!((percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_previous_close_leaves_change_unset() {
        let quote = Quote::with_change(
            "NEWCO",
            None,
            dec!(5.00),
            Some(Decimal::ZERO),
            "USD",
            "YAHOO",
            Utc::now(),
        );
        assert!(quote.change.is_none());
        assert!(quote.change_percent.is_none());
    }

    #[test]
    fn test_absent_previous_close_leaves_change_unset() {
        let quote = Quote::with_change("X", None, dec!(5.00), None, "USD", "YAHOO", Utc::now());
        assert!(quote.change.is_none());
        assert!(quote.change_percent.is_none());
    }

    #[test]
    fn test_negative_change() {
        let quote = Quote::with_change(
            "TSLA",
            None,
            dec!(90.00),
            Some(dec!(100.00)),
            "USD",
            "YAHOO",
            Utc::now(),
        );
        assert_eq!(quote.change, Some(dec!(-10.00)));
        assert!((quote.change_percent.unwrap() + 10.0).abs() < 1e-9);
    }
}

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use marketdeck_market_data::{
    AssetKind, CompanyProfile, CryptoFundamentals, CryptoMetrics, Fundamentals, Quote,
    StockFundamentals,
};

/// Source marker for the quote-overlap fallback path
const QUOTE_SOURCE: &str = "quote";

/// Source marker when nothing could be sourced at all
const NONE_SOURCE: &str = "none";

/// Source marker for the static crypto default table
const DEFAULTS_SOURCE: &str = "defaults";

/// Static fallback metrics for major coins, used when the metrics provider
/// is unreachable. Supply figures are frozen snapshots, good enough to keep
/// the response shape complete; dominance is a rough long-run share.
struct CryptoDefault {
    circulating_supply: f64,
    max_supply: Option<f64>,
    market_dominance: f64,
}

lazy_static! {
    static ref CRYPTO_DEFAULTS: HashMap<&'static str, CryptoDefault> = HashMap::from([
        (
            "BTC",
            CryptoDefault {
                circulating_supply: 19_700_000.0,
                max_supply: Some(21_000_000.0),
                market_dominance: 52.0,
            },
        ),
        (
            "ETH",
            CryptoDefault {
                circulating_supply: 120_000_000.0,
                max_supply: None,
                market_dominance: 17.0,
            },
        ),
        (
            "SOL",
            CryptoDefault {
                circulating_supply: 470_000_000.0,
                max_supply: None,
                market_dominance: 2.5,
            },
        ),
        (
            "XRP",
            CryptoDefault {
                circulating_supply: 55_000_000_000.0,
                max_supply: Some(100_000_000_000.0),
                market_dominance: 2.0,
            },
        ),
        (
            "DOGE",
            CryptoDefault {
                circulating_supply: 144_000_000_000.0,
                max_supply: None,
                market_dominance: 1.0,
            },
        ),
    ]);
}

/// Synthesize the fundamentals record for a snapshot.
///
/// Keyed on asset classification:
/// - crypto uses the metrics-provider result when present, else the static
///   default table (majors) or a generic default;
/// - everything else prefers the profile-provider result, falls back to the
///   primary quote's overlapping fields, and bottoms out at an all-unknown
///   record.
///
/// Metrics with no integrated source stay `None`: unknown, never invented.
pub fn synthesize(
    kind: AssetKind,
    quote: &Quote,
    profile: Option<&CompanyProfile>,
    metrics: Option<CryptoMetrics>,
) -> Fundamentals {
    match kind {
        AssetKind::Crypto => Fundamentals::Crypto(synthesize_crypto(&quote.symbol, metrics)),
        AssetKind::Stock | AssetKind::Etf | AssetKind::Index => {
            Fundamentals::Stock(synthesize_stock(quote, profile))
        }
    }
}

fn synthesize_stock(quote: &Quote, profile: Option<&CompanyProfile>) -> StockFundamentals {
    if let Some(profile) = profile {
        let mut fundamentals = StockFundamentals {
            market_cap: profile.market_cap,
            pe_ratio: profile.pe_ratio,
            eps: profile.eps,
            beta: profile.beta,
            dividend_yield: profile.dividend_yield,
            profit_margin: profile.profit_margin,
            revenue_growth: profile.revenue_growth,
            debt_to_equity: profile.debt_to_equity,
            week_52_high: profile.week_52_high,
            week_52_low: profile.week_52_low,
            sector: profile.sector.clone(),
            industry: profile.industry.clone(),
            source: profile
                .source
                .clone()
                .unwrap_or_else(|| QUOTE_SOURCE.to_string()),
            is_estimated: false,
        };

        // The quote can still plug a market cap gap
        if fundamentals.market_cap.is_none() {
            fundamentals.market_cap = quote.market_cap.as_ref().and_then(Decimal::to_f64);
        }

        return fundamentals;
    }

    if quote.market_cap.is_some() {
        return StockFundamentals {
            market_cap: quote.market_cap.as_ref().and_then(Decimal::to_f64),
            source: QUOTE_SOURCE.to_string(),
            is_estimated: true,
            ..Default::default()
        };
    }

    StockFundamentals {
        source: NONE_SOURCE.to_string(),
        is_estimated: true,
        ..Default::default()
    }
}

fn synthesize_crypto(symbol: &str, metrics: Option<CryptoMetrics>) -> CryptoFundamentals {
    if let Some(metrics) = metrics {
        return CryptoFundamentals {
            circulating_supply: metrics.circulating_supply,
            total_supply: metrics.total_supply,
            max_supply: metrics.max_supply,
            market_dominance: metrics.market_dominance,
            all_time_high: metrics.all_time_high,
            all_time_low: metrics.all_time_low,
            price_change_30d: metrics.price_change_30d,
            // No provider integrated for these; explicit unknowns
            volatility: None,
            whale_activity: None,
            network_health: None,
            source: metrics.source,
            is_estimated: false,
        };
    }

    warn!(
        "Crypto metrics unavailable for '{}'; falling back to static defaults",
        symbol
    );

    let upper = symbol.to_uppercase();
    if let Some(default) = CRYPTO_DEFAULTS.get(upper.as_str()) {
        return CryptoFundamentals {
            circulating_supply: Decimal::from_f64_retain(default.circulating_supply),
            max_supply: default.max_supply.and_then(Decimal::from_f64_retain),
            market_dominance: Some(default.market_dominance),
            source: DEFAULTS_SOURCE.to_string(),
            is_estimated: true,
            ..Default::default()
        };
    }

    CryptoFundamentals {
        source: DEFAULTS_SOURCE.to_string(),
        is_estimated: true,
        ..Default::default()
    }
}

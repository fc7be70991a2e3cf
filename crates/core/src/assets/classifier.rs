use std::collections::HashSet;

use lazy_static::lazy_static;

use marketdeck_market_data::AssetKind;

lazy_static! {
    /// Curated crypto ticker symbols
    static ref CRYPTO_SYMBOLS: HashSet<&'static str> = [
        "BTC", "ETH", "SOL", "XRP", "ADA", "DOGE", "DOT", "MATIC", "AVAX", "LINK", "LTC", "BNB",
        "UNI", "ATOM", "SHIB", "XLM", "TRX", "NEAR", "ALGO", "FIL",
    ]
    .into_iter()
    .collect();

    /// Curated ETF ticker symbols
    static ref ETF_SYMBOLS: HashSet<&'static str> = [
        "SPY", "QQQ", "VOO", "VTI", "IWM", "DIA", "EFA", "EEM", "GLD", "SLV", "XLF", "XLK", "XLE",
        "ARKK", "TLT", "HYG", "VEA", "VWO", "SCHD", "JEPI",
    ]
    .into_iter()
    .collect();
}

/// Classify a ticker-like string into an asset kind.
///
/// Pure and total: case-insensitive, never fails, defaults to `Stock`. A
/// leading `^` marks an index; curated membership lists identify crypto and
/// ETFs.
pub fn detect_asset_kind(symbol: &str) -> AssetKind {
    let normalized = symbol.trim().to_uppercase();

    if normalized.starts_with('^') {
        return AssetKind::Index;
    }
    if CRYPTO_SYMBOLS.contains(normalized.as_str()) {
        return AssetKind::Crypto;
    }
    if ETF_SYMBOLS.contains(normalized.as_str()) {
        return AssetKind::Etf;
    }

    AssetKind::Stock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_membership() {
        assert_eq!(detect_asset_kind("BTC"), AssetKind::Crypto);
        assert_eq!(detect_asset_kind("ETH"), AssetKind::Crypto);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_asset_kind("btc"), AssetKind::Crypto);
        assert_eq!(detect_asset_kind("sPy"), AssetKind::Etf);
        assert_eq!(detect_asset_kind("aapl"), AssetKind::Stock);
    }

    #[test]
    fn test_index_prefix() {
        assert_eq!(detect_asset_kind("^GSPC"), AssetKind::Index);
        assert_eq!(detect_asset_kind("^dji"), AssetKind::Index);
    }

    #[test]
    fn test_defaults_to_stock() {
        assert_eq!(detect_asset_kind("AAPL"), AssetKind::Stock);
        assert_eq!(detect_asset_kind("ZZZZZ"), AssetKind::Stock);
        assert_eq!(detect_asset_kind(""), AssetKind::Stock);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(detect_asset_kind(" btc "), AssetKind::Crypto);
    }
}

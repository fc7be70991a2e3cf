//! Core error types for the aggregation engine.

use thiserror::Error;

use marketdeck_market_data::ProviderError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the aggregation engine.
///
/// Most provider failures degrade inside the engine and never reach this
/// type; what does reach it is fatal for the request.
#[derive(Error, Debug)]
pub enum Error {
    /// The request symbol was empty or malformed.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The primary quote could not be fetched. The quote asserts that the
    /// asset exists and is priced, so the whole request fails, naming the
    /// symbol and the underlying cause. No synthetic data is substituted on
    /// this path.
    #[error("Failed to fetch quote for '{symbol}': {source}")]
    PrimaryQuoteFailed {
        /// The symbol that could not be quoted
        symbol: String,
        /// The underlying provider error
        source: ProviderError,
    },

    /// A provider operation failed outside the degradable paths.
    #[error("Provider operation failed: {0}")]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_quote_failure_names_symbol_and_cause() {
        let error = Error::PrimaryQuoteFailed {
            symbol: "AAPL".to_string(),
            source: ProviderError::Timeout {
                provider: "YAHOO".to_string(),
            },
        };
        let message = format!("{}", error);
        assert!(message.contains("AAPL"));
        assert!(message.contains("YAHOO"));
    }

    #[test]
    fn test_invalid_symbol_display() {
        let error = Error::InvalidSymbol("symbol must not be empty".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid symbol: symbol must not be empty"
        );
    }
}

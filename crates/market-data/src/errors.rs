//! Error types and availability classification for provider adapters.
//!
//! This module provides:
//! - [`ProviderError`]: the error enum every adapter call resolves to
//! - [`Availability`]: classification that tells the coordinator how to treat
//!   a failed call

use thiserror::Error;

/// How the coordinator should treat a provider failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// The capability is not configured (missing credential, unsupported
    /// operation, nothing to return). Logged at info, never surfaced.
    Unavailable,

    /// The upstream call failed (timeout, non-2xx, malformed payload).
    /// Logged with provider and cause; siblings proceed.
    UpstreamFailure,

    /// The symbol itself is bad. Fatal for the primary-quote path.
    Fatal,
}

/// Errors that can occur during a provider adapter call.
///
/// Adapters never let a failure escape in any other form: every reqwest,
/// parsing, or upstream error is mapped to one of these variants with the
/// provider named.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider requires an API key that is not configured.
    #[error("Missing credential for provider: {provider}")]
    MissingCredential {
        /// The provider lacking a credential
        provider: String,
    },

    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429 or quota headers).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider returned a non-success response.
    #[error("Upstream error: {provider} - {message}")]
    Upstream {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider responded but the payload could not be parsed.
    #[error("Parse error: {provider} - {message}")]
    Parse {
        /// The provider whose payload failed to parse
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by provider: {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider that does not support it
        provider: String,
    },

    /// The provider answered successfully but had nothing for the symbol.
    #[error("No data from provider: {provider}")]
    NoData {
        /// The provider with no data
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Classify this error for the fan-out coordinator.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketdeck_market_data::errors::{Availability, ProviderError};
    ///
    /// let error = ProviderError::MissingCredential { provider: "FINNHUB".to_string() };
    /// assert_eq!(error.availability(), Availability::Unavailable);
    ///
    /// let error = ProviderError::Timeout { provider: "YAHOO".to_string() };
    /// assert_eq!(error.availability(), Availability::UpstreamFailure);
    /// ```
    pub fn availability(&self) -> Availability {
        match self {
            // Capability not configured - silent degradation
            Self::MissingCredential { .. } | Self::NotSupported { .. } | Self::NoData { .. } => {
                Availability::Unavailable
            }

            // Upstream trouble - log and continue with siblings
            Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::Upstream { .. }
            | Self::Parse { .. }
            | Self::Network(_) => Availability::UpstreamFailure,

            // Bad symbol - fatal on the primary path
            Self::SymbolNotFound(_) => Availability::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_unavailable() {
        let error = ProviderError::MissingCredential {
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(error.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_not_supported_is_unavailable() {
        let error = ProviderError::NotSupported {
            operation: "history".to_string(),
            provider: "FMP".to_string(),
        };
        assert_eq!(error.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_no_data_is_unavailable() {
        let error = ProviderError::NoData {
            provider: "NEWSAPI".to_string(),
        };
        assert_eq!(error.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_timeout_is_upstream_failure() {
        let error = ProviderError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.availability(), Availability::UpstreamFailure);
    }

    #[test]
    fn test_rate_limited_is_upstream_failure() {
        let error = ProviderError::RateLimited {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert_eq!(error.availability(), Availability::UpstreamFailure);
    }

    #[test]
    fn test_parse_is_upstream_failure() {
        let error = ProviderError::Parse {
            provider: "COINGECKO".to_string(),
            message: "unexpected shape".to_string(),
        };
        assert_eq!(error.availability(), Availability::UpstreamFailure);
    }

    #[test]
    fn test_symbol_not_found_is_fatal() {
        let error = ProviderError::SymbolNotFound("INVALID".to_string());
        assert_eq!(error.availability(), Availability::Fatal);
    }

    #[test]
    fn test_error_display() {
        let error = ProviderError::Upstream {
            provider: "FINNHUB".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Upstream error: FINNHUB - HTTP 500");

        let error = ProviderError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");
    }
}

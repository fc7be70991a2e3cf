//! Engine configuration.
//!
//! All configuration is environment-provided and read once at startup into
//! an explicit [`Settings`] value that is passed into the service; there is
//! no ambient global state. A missing credential degrades the matching
//! capability and is logged at info level; it never crashes the process.

use std::env;
use std::time::Duration;

use log::info;

/// Environment variable names, one per provider credential.
pub const ENV_FINNHUB_API_KEY: &str = "FINNHUB_API_KEY";
pub const ENV_ALPHA_VANTAGE_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
pub const ENV_NEWSAPI_API_KEY: &str = "NEWSAPI_API_KEY";
pub const ENV_FMP_API_KEY: &str = "FMP_API_KEY";
pub const ENV_COINGECKO_API_KEY: &str = "COINGECKO_API_KEY";

/// Engine settings: provider credentials plus the policy knobs (article
/// cap, history depth, timeouts). The caps are governable configuration,
/// not contract requirements.
#[derive(Clone, Debug)]
pub struct Settings {
    pub finnhub_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub newsapi_api_key: Option<String>,
    pub fmp_api_key: Option<String>,
    pub coingecko_api_key: Option<String>,

    /// Maximum articles returned after reconciliation
    pub max_articles: usize,

    /// Articles requested from each news provider before reconciliation
    pub per_provider_news_limit: usize,

    /// Days of chart history requested
    pub history_days: u32,

    /// Historical quarters carried on an earnings record
    pub earnings_history_quarters: usize,

    /// Upper bound on concurrent upstream calls per service
    pub max_inflight_requests: usize,

    /// Budget for the primary quote fetch
    pub quote_timeout: Duration,

    /// Budget for the profile fetch
    pub profile_timeout: Duration,

    /// Budget for each news provider fetch
    pub news_timeout: Duration,

    /// Budget for the chart history fetch
    pub history_timeout: Duration,

    /// Budget for each earnings provider fetch
    pub earnings_timeout: Duration,

    /// Budget for the crypto metrics fetch
    pub crypto_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            alpha_vantage_api_key: None,
            newsapi_api_key: None,
            fmp_api_key: None,
            coingecko_api_key: None,
            max_articles: 25,
            per_provider_news_limit: 20,
            history_days: 30,
            earnings_history_quarters: 4,
            max_inflight_requests: 8,
            quote_timeout: Duration::from_secs(10),
            profile_timeout: Duration::from_secs(8),
            news_timeout: Duration::from_secs(10),
            history_timeout: Duration::from_secs(10),
            earnings_timeout: Duration::from_secs(12),
            crypto_timeout: Duration::from_secs(15),
        }
    }
}

impl Settings {
    /// Load settings from the environment. Absent keys leave the matching
    /// capability unconfigured.
    pub fn from_env() -> Self {
        let mut settings = Self {
            finnhub_api_key: read_key(ENV_FINNHUB_API_KEY),
            alpha_vantage_api_key: read_key(ENV_ALPHA_VANTAGE_API_KEY),
            newsapi_api_key: read_key(ENV_NEWSAPI_API_KEY),
            fmp_api_key: read_key(ENV_FMP_API_KEY),
            coingecko_api_key: read_key(ENV_COINGECKO_API_KEY),
            ..Self::default()
        };

        if let Some(limit) = read_usize("MARKETDECK_MAX_ARTICLES") {
            settings.max_articles = limit;
        }
        if let Some(quarters) = read_usize("MARKETDECK_EARNINGS_QUARTERS") {
            settings.earnings_history_quarters = quarters;
        }

        settings
    }
}

fn read_key(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            info!("{} is not set; the matching provider will be skipped", name);
            None
        }
    }
}

fn read_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let settings = Settings::default();
        assert_eq!(settings.max_articles, 25);
        assert_eq!(settings.earnings_history_quarters, 4);
        assert!(settings.quote_timeout >= Duration::from_secs(8));
        assert!(settings.crypto_timeout <= Duration::from_secs(15));
    }
}

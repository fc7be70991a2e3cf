use serde::{Deserialize, Serialize};

/// Company profile data from a fundamentals-capable provider.
///
/// All metric fields are optional: providers expose different subsets and the
/// fundamentals synthesizer treats absent values as unknown rather than
/// fabricating them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Provider that supplied this profile (e.g. "FMP", "YAHOO")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Company/asset name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Business sector (e.g. "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within sector (e.g. "Consumer Electronics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    /// Price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,

    /// Earnings per share (trailing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,

    /// Beta versus the broad market
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,

    /// Dividend yield as a decimal (0.025 = 2.5%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// Net profit margin as a decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,

    /// Year-over-year revenue growth as a decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<f64>,

    /// Debt-to-equity ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,

    /// 52-week high price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,

    /// 52-week low price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,
}

impl CompanyProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile attributed to a source.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_skips_absent_fields() {
        let profile = CompanyProfile {
            source: Some("FMP".to_string()),
            name: Some("Test Company".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Test Company"));
        assert!(!json.contains("peRatio"));
        assert!(!json.contains("dividendYield"));
    }
}

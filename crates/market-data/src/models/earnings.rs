use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marker value for a synthesized earnings record.
pub const ESTIMATED_SOURCE: &str = "Estimated";

/// One reported (or estimated) quarter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuarter {
    /// Fiscal period label (Q1..Q4)
    pub period: String,

    pub year: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<Decimal>,

    /// Year-over-year growth, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_yoy: Option<f64>,
}

impl EarningsQuarter {
    /// An all-unknown quarter with only the period labels filled in.
    pub fn unknown(period: impl Into<String>, year: i32) -> Self {
        Self {
            period: period.into(),
            year,
            revenue: None,
            net_income: None,
            eps: None,
            growth_yoy: None,
        }
    }
}

/// Earnings record for one symbol. `source` names the provider, or
/// [`ESTIMATED_SOURCE`] when every provider failed and the record was
/// synthesized. Callers must be able to tell the two apart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    pub success: bool,

    pub source: String,

    pub latest: EarningsQuarter,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlook: Option<String>,

    /// Up to the configured number of historical quarters, newest first
    pub history: Vec<EarningsQuarter>,
}

impl EarningsReport {
    /// Synthesize the clearly-marked fallback record: real quarter/year
    /// labels walking back from the current date, every metric an explicit
    /// unknown. Deterministic in shape, not pretending to carry values.
    pub fn estimated(quarters: usize) -> Self {
        let now = Utc::now();
        let mut labels = quarter_labels(now.year(), quarter_of_month(now.month()), quarters + 1);
        let latest = labels.remove(0);

        Self {
            success: true,
            source: ESTIMATED_SOURCE.to_string(),
            latest,
            outlook: None,
            history: labels,
        }
    }

    /// Whether the record was synthesized rather than provider-sourced.
    pub fn is_estimated(&self) -> bool {
        self.source == ESTIMATED_SOURCE
    }
}

fn quarter_of_month(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// Walk quarters backwards from the given starting quarter, inclusive.
fn quarter_labels(mut year: i32, mut quarter: u32, count: usize) -> Vec<EarningsQuarter> {
    let mut labels = Vec::with_capacity(count);
    for _ in 0..count {
        labels.push(EarningsQuarter::unknown(format!("Q{}", quarter), year));
        if quarter == 1 {
            quarter = 4;
            year -= 1;
        } else {
            quarter -= 1;
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_report_shape() {
        let report = EarningsReport::estimated(4);
        assert!(report.success);
        assert_eq!(report.source, "Estimated");
        assert!(report.is_estimated());
        assert_eq!(report.history.len(), 4);
        assert!(report.latest.revenue.is_none());
        assert!(report.latest.eps.is_none());
    }

    #[test]
    fn test_quarter_labels_walk_backwards_across_years() {
        let labels = quarter_labels(2026, 1, 3);
        assert_eq!(labels[0].period, "Q1");
        assert_eq!(labels[0].year, 2026);
        assert_eq!(labels[1].period, "Q4");
        assert_eq!(labels[1].year, 2025);
        assert_eq!(labels[2].period, "Q3");
        assert_eq!(labels[2].year, 2025);
    }

    #[test]
    fn test_quarter_of_month() {
        assert_eq!(quarter_of_month(1), 1);
        assert_eq!(quarter_of_month(3), 1);
        assert_eq!(quarter_of_month(4), 2);
        assert_eq!(quarter_of_month(12), 4);
    }
}

//! Sentiment aggregation.
//!
//! Rolls per-article sentiment labels into one distribution and composite
//! score for the snapshot.

use serde::{Deserialize, Serialize};

use marketdeck_market_data::{Article, Sentiment};

/// Composite score thresholds for the overall label
const POSITIVE_THRESHOLD: f64 = 20.0;
const NEGATIVE_THRESHOLD: f64 = -20.0;

/// Aggregated sentiment over a ranked article list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,

    /// Composite score in [-100, 100]
    pub score: f64,

    /// Overall label, bucketed at the ±20 thresholds
    pub overall: Sentiment,
}

impl SentimentSummary {
    /// The neutral summary for an empty article set.
    pub fn empty() -> Self {
        Self {
            positive: 0,
            negative: 0,
            neutral: 0,
            score: 0.0,
            overall: Sentiment::Neutral,
        }
    }
}

/// Aggregate article sentiment: `score = (positive - negative) / total * 100`,
/// with the overall label bucketed at ±20. Empty input is neutral with
/// score 0.
pub fn aggregate(articles: &[Article]) -> SentimentSummary {
    if articles.is_empty() {
        return SentimentSummary::empty();
    }

    let mut positive = 0;
    let mut negative = 0;
    let mut neutral = 0;

    for article in articles {
        match article.sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Negative => negative += 1,
            Sentiment::Neutral => neutral += 1,
        }
    }

    let total = articles.len() as f64;
    let score = (positive as f64 - negative as f64) / total * 100.0;

    let overall = if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    SentimentSummary {
        positive,
        negative,
        neutral,
        score,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use marketdeck_market_data::SourceTier;

    fn article(sentiment: Sentiment) -> Article {
        Article::new(
            "Some headline",
            "",
            "Test Source",
            SourceTier::Tier3,
            "https://example.com",
            Utc::now(),
            sentiment,
        )
    }

    #[test]
    fn test_distribution_and_score() {
        let articles = vec![
            article(Sentiment::Positive),
            article(Sentiment::Positive),
            article(Sentiment::Negative),
            article(Sentiment::Neutral),
        ];

        let summary = aggregate(&articles);
        assert_eq!(summary.positive, 2);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 1);
        assert!((summary.score - 25.0).abs() < 1e-9);
        assert_eq!(summary.overall, Sentiment::Positive);
    }

    #[test]
    fn test_empty_is_neutral() {
        let summary = aggregate(&[]);
        assert_eq!(summary.score, 0.0);
        assert_eq!(summary.overall, Sentiment::Neutral);
        assert_eq!(summary.positive + summary.negative + summary.neutral, 0);
    }

    #[test]
    fn test_score_at_threshold_stays_neutral() {
        // 3 positive, 1 negative, 6 neutral: score = 20, not over the bar
        let mut articles = vec![
            article(Sentiment::Positive),
            article(Sentiment::Positive),
            article(Sentiment::Positive),
            article(Sentiment::Negative),
        ];
        articles.extend((0..6).map(|_| article(Sentiment::Neutral)));

        let summary = aggregate(&articles);
        assert!((summary.score - 20.0).abs() < 1e-9);
        assert_eq!(summary.overall, Sentiment::Neutral);
    }

    #[test]
    fn test_negative_label() {
        let articles = vec![
            article(Sentiment::Negative),
            article(Sentiment::Negative),
            article(Sentiment::Positive),
        ];

        let summary = aggregate(&articles);
        assert!(summary.score < NEGATIVE_THRESHOLD);
        assert_eq!(summary.overall, Sentiment::Negative);
    }
}

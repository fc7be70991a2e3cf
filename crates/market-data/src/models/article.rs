use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Source tier
// ============================================================================

/// Coarse trust bucket for a news source, used to break ranking ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Tier1,
    Tier2,
    Tier3,
}

lazy_static! {
    /// Wire-service grade outlets
    static ref TIER1_SOURCES: HashSet<&'static str> = [
        "reuters",
        "bloomberg",
        "associated press",
        "ap news",
        "dow jones",
        "wall street journal",
        "financial times",
    ]
    .into_iter()
    .collect();

    /// Mainstream financial media
    static ref TIER2_SOURCES: HashSet<&'static str> = [
        "cnbc",
        "marketwatch",
        "barron's",
        "barrons",
        "yahoo finance",
        "forbes",
        "business insider",
        "the motley fool",
        "seeking alpha",
        "investor's business daily",
        "benzinga",
    ]
    .into_iter()
    .collect();
}

impl SourceTier {
    /// Ranking weight: tier1 outranks tier2 outranks tier3/unknown.
    pub const fn weight(self) -> u8 {
        match self {
            Self::Tier1 => 3,
            Self::Tier2 => 2,
            Self::Tier3 => 1,
        }
    }

    /// Classify a source name into a tier. Unknown sources are tier3.
    pub fn classify(source_name: &str) -> Self {
        let normalized = source_name.trim().to_lowercase();
        if TIER1_SOURCES.contains(normalized.as_str()) {
            Self::Tier1
        } else if TIER2_SOURCES.contains(normalized.as_str()) {
            Self::Tier2
        } else {
            Self::Tier3
        }
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Per-article sentiment label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Lexical polarity word lists for providers without native sentiment.
const POSITIVE_WORDS: &[&str] = &[
    "surge", "rally", "beat", "growth", "gain", "profit", "record", "upgrade", "strong", "bullish",
    "soar", "jump", "outperform", "exceed", "boost",
];

const NEGATIVE_WORDS: &[&str] = &[
    "fall", "drop", "miss", "loss", "decline", "downgrade", "weak", "bearish", "plunge", "slump",
    "warn", "lawsuit", "probe", "recall",
];

impl Sentiment {
    /// Classify by counting polarity words in the headline and summary.
    /// Ties (including zero matches) are neutral.
    pub fn from_text(headline: &str, summary: &str) -> Self {
        let text = format!("{} {}", headline, summary).to_lowercase();

        let positive = POSITIVE_WORDS
            .iter()
            .filter(|word| text.contains(*word))
            .count();
        let negative = NEGATIVE_WORDS
            .iter()
            .filter(|word| text.contains(*word))
            .count();

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Self::Positive,
            std::cmp::Ordering::Less => Self::Negative,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }

    /// Bucket a provider-native sentiment score at the ±0.1 thresholds.
    pub fn from_score(score: f64) -> Self {
        if score > 0.1 {
            Self::Positive
        } else if score < -0.1 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

// ============================================================================
// Impact and category
// ============================================================================

/// Expected market impact derived from headline keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

const HIGH_IMPACT_TERMS: &[&str] = &[
    "earnings", "acquisition", "merger", "bankruptcy", "sec", "lawsuit", "fda", "recall",
];

const MEDIUM_IMPACT_TERMS: &[&str] = &[
    "upgrade", "downgrade", "guidance", "forecast", "partnership", "launch", "ceo",
];

impl Impact {
    /// Derive impact from the headline. Buckets are checked high to medium;
    /// anything else is low.
    pub fn from_headline(headline: &str) -> Self {
        let lowered = headline.to_lowercase();
        if HIGH_IMPACT_TERMS.iter().any(|term| lowered.contains(term)) {
            Self::High
        } else if MEDIUM_IMPACT_TERMS.iter().any(|term| lowered.contains(term)) {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Mutually exclusive article category; the first matching bucket wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Earnings,
    Analyst,
    Corporate,
    Legal,
    General,
}

impl NewsCategory {
    /// Derive the category from the headline. Check order matters: the
    /// buckets are exclusive and earlier buckets win.
    pub fn from_headline(headline: &str) -> Self {
        let lowered = headline.to_lowercase();
        const EARNINGS: &[&str] = &["earnings", "revenue", "eps", "quarterly", "profit"];
        const ANALYST: &[&str] = &["upgrade", "downgrade", "price target", "analyst", "rating"];
        const CORPORATE: &[&str] = &["acquisition", "merger", "ceo", "partnership", "launch"];
        const LEGAL: &[&str] = &["lawsuit", "sec", "investigation", "probe", "settlement"];

        if EARNINGS.iter().any(|term| lowered.contains(term)) {
            Self::Earnings
        } else if ANALYST.iter().any(|term| lowered.contains(term)) {
            Self::Analyst
        } else if CORPORATE.iter().any(|term| lowered.contains(term)) {
            Self::Corporate
        } else if LEGAL.iter().any(|term| lowered.contains(term)) {
            Self::Legal
        } else {
            Self::General
        }
    }
}

// ============================================================================
// Article
// ============================================================================

/// One news article, created per-request from a provider response and
/// discarded after the response is sent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub tier: SourceTier,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub impact: Impact,
    /// Relevance score assigned during reconciliation; 0 until scored
    pub relevance: i32,
    pub category: NewsCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl Article {
    /// Build an article from normalized provider fields, deriving category
    /// and impact from the headline.
    pub fn new(
        headline: impl Into<String>,
        summary: impl Into<String>,
        source: impl Into<String>,
        tier: SourceTier,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
        sentiment: Sentiment,
    ) -> Self {
        let headline = headline.into();
        let impact = Impact::from_headline(&headline);
        let category = NewsCategory::from_headline(&headline);

        Self {
            headline,
            summary: summary.into(),
            source: source.into(),
            tier,
            url: url.into(),
            published_at,
            sentiment,
            impact,
            relevance: 0,
            category,
            raw_content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_classify_known_sources() {
        assert_eq!(SourceTier::classify("Reuters"), SourceTier::Tier1);
        assert_eq!(SourceTier::classify("Bloomberg"), SourceTier::Tier1);
        assert_eq!(SourceTier::classify("CNBC"), SourceTier::Tier2);
        assert_eq!(SourceTier::classify("Some Blog"), SourceTier::Tier3);
    }

    #[test]
    fn test_tier_weights_are_ordered() {
        assert!(SourceTier::Tier1.weight() > SourceTier::Tier2.weight());
        assert!(SourceTier::Tier2.weight() > SourceTier::Tier3.weight());
    }

    #[test]
    fn test_lexical_sentiment_positive() {
        let sentiment = Sentiment::from_text("Shares surge after record earnings beat", "");
        assert_eq!(sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_lexical_sentiment_tie_is_neutral() {
        let sentiment = Sentiment::from_text("Stock gains after loss narrows", "");
        assert_eq!(sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_score_sentiment_thresholds() {
        assert_eq!(Sentiment::from_score(0.25), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(0.1), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.05), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.3), Sentiment::Negative);
    }

    #[test]
    fn test_category_first_bucket_wins() {
        // "earnings" and "upgrade" both present; earnings is checked first
        let category = NewsCategory::from_headline("Analyst upgrade follows earnings surprise");
        assert_eq!(category, NewsCategory::Earnings);
    }

    #[test]
    fn test_category_general_when_nothing_matches() {
        let category = NewsCategory::from_headline("Company opens new office");
        assert_eq!(category, NewsCategory::General);
    }

    #[test]
    fn test_impact_from_headline() {
        assert_eq!(Impact::from_headline("Merger talks confirmed"), Impact::High);
        assert_eq!(Impact::from_headline("CEO outlines strategy"), Impact::Medium);
        assert_eq!(Impact::from_headline("New store opening"), Impact::Low);
    }

    #[test]
    fn test_article_new_derives_classification() {
        let article = Article::new(
            "Quarterly earnings top estimates",
            "Revenue grew",
            "Reuters",
            SourceTier::Tier1,
            "https://example.com/a",
            Utc::now(),
            Sentiment::Positive,
        );
        assert_eq!(article.category, NewsCategory::Earnings);
        assert_eq!(article.impact, Impact::High);
        assert_eq!(article.relevance, 0);
    }
}

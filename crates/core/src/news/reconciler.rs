use std::collections::HashSet;

use log::debug;

use marketdeck_market_data::Article;

/// Financial keywords worth +5 relevance each
const FINANCIAL_KEYWORDS: &[&str] = &[
    "earnings", "revenue", "profit", "loss", "guidance", "outlook", "forecast",
];

/// High-impact terms worth +3 relevance each
const HIGH_IMPACT_TERMS: &[&str] = &["ceo", "acquisition", "merger", "partnership", "lawsuit"];

/// Characters of lowercased headline used as the dedup key.
///
/// The prefix heuristic is deliberate: near-duplicates that diverge before
/// character 50 survive, and distinct headlines sharing a 50-character
/// prefix collapse.
const DEDUP_PREFIX_LEN: usize = 50;

/// Additive relevance score for one article.
///
/// +10 when the symbol appears in headline or summary (case-insensitive),
/// +5 per matched financial keyword, +3 per matched high-impact term.
/// No upper bound, no normalization.
pub fn relevance_score(article: &Article, symbol: &str) -> i32 {
    let text = format!("{} {}", article.headline, article.summary).to_lowercase();
    let symbol = symbol.to_lowercase();

    let mut score = 0;

    if !symbol.is_empty() && text.contains(&symbol) {
        score += 10;
    }

    for keyword in FINANCIAL_KEYWORDS {
        if text.contains(keyword) {
            score += 5;
        }
    }

    for term in HIGH_IMPACT_TERMS {
        if text.contains(term) {
            score += 3;
        }
    }

    score
}

fn dedup_key(headline: &str) -> String {
    headline
        .to_lowercase()
        .chars()
        .take(DEDUP_PREFIX_LEN)
        .collect()
}

/// Reconcile the merged article lists from all providers.
///
/// Pipeline: deduplicate (first occurrence wins, across providers) → assign
/// relevance scores → sort by score, then source tier weight, then recency →
/// truncate to `cap`.
pub fn reconcile(articles: Vec<Article>, symbol: &str, cap: usize) -> Vec<Article> {
    let total = articles.len();

    let mut seen = HashSet::new();
    let mut unique: Vec<Article> = articles
        .into_iter()
        .filter(|article| seen.insert(dedup_key(&article.headline)))
        .collect();

    if unique.len() < total {
        debug!(
            "News reconciliation dropped {} duplicate article(s)",
            total - unique.len()
        );
    }

    for article in &mut unique {
        article.relevance = relevance_score(article, symbol);
    }

    unique.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| b.tier.weight().cmp(&a.tier.weight()))
            .then_with(|| b.published_at.cmp(&a.published_at))
    });

    unique.truncate(cap);
    unique
}

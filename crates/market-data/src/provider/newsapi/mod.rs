//! NewsAPI.org provider implementation.
//!
//! Headline search via the /v2/everything endpoint. NewsAPI carries no
//! sentiment of its own, so articles are classified lexically; source names
//! map to trust tiers.
//!
//! API documentation: https://newsapi.org/docs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;

use crate::errors::ProviderError;
use crate::models::{Article, Sentiment, SourceTier};
use crate::provider::NewsProvider;

const BASE_URL: &str = "https://newsapi.org/v2";
const PROVIDER_ID: &str = "NEWSAPI";

/// Per-request budget for NewsAPI calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /v2/everything
#[derive(Debug, Deserialize)]
struct EverythingResponse {
    /// "ok" or "error"
    status: String,
    #[serde(default)]
    articles: Vec<ArticleItem>,
    /// Error message when status is "error"
    message: Option<String>,
    /// Error code when status is "error" (e.g. "rateLimited", "apiKeyInvalid")
    code: Option<String>,
    // Note: totalResults field exists but we use articles.len() instead
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleItem {
    source: SourceRef,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
    content: Option<String>,
    // Note: author and urlToImage fields exist but are not mapped
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    name: Option<String>,
}

// ============================================================================
// NewsApiProvider
// ============================================================================

/// NewsAPI.org headline provider.
///
/// Requires an API key; the developer tier allows 100 requests per day.
pub struct NewsApiProvider {
    client: Client,
    api_key: String,
}

impl NewsApiProvider {
    /// Create a new NewsAPI provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<Article>, ProviderError> {
        let url = format!(
            "{}/everything?q={}&language=en&sortBy=publishedAt&pageSize={}",
            BASE_URL,
            encode(symbol),
            limit.min(100)
        );

        debug!("NewsAPI request for '{}'", symbol);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    ProviderError::Upstream {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let parsed: EverythingResponse =
            response.json().await.map_err(|e| ProviderError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        if parsed.status != "ok" {
            // NewsAPI reports errors in the body with a machine code
            if parsed.code.as_deref() == Some("rateLimited") {
                return Err(ProviderError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: parsed
                    .message
                    .unwrap_or_else(|| "Unknown NewsAPI error".to_string()),
            });
        }

        let articles = parsed
            .articles
            .into_iter()
            .filter_map(|item| {
                let headline = item.title.filter(|t| !t.is_empty())?;
                let summary = item.description.unwrap_or_default();
                let source = item
                    .source
                    .name
                    .unwrap_or_else(|| PROVIDER_ID.to_string());
                let published_at = item.published_at?;

                let sentiment = Sentiment::from_text(&headline, &summary);
                let tier = SourceTier::classify(&source);

                let mut article = Article::new(
                    headline,
                    summary,
                    source,
                    tier,
                    item.url.unwrap_or_default(),
                    published_at,
                    sentiment,
                );
                article.raw_content = item.content;
                Some(article)
            })
            .take(limit)
            .collect();

        Ok(articles)
    }
}

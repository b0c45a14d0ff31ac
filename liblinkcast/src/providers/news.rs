//! NewsAPI topic suggestions
//!
//! Fetches recent headlines matching a query so an operator can pick a
//! post topic from what is currently being written about.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::NewsProvider;
use crate::config::NewsConfig;
use crate::error::{ConfigError, ProviderError, Result};
use crate::types::NewsSuggestion;

/// Environment variable holding the NewsAPI key
pub const API_KEY_VAR: &str = "NEWSAPI_KEY";

/// Parameters for one suggestions lookup
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub keywords: String,
    pub language: String,
    pub sort_by: String,
    pub page_size: u32,
    /// Lookback window in days; articles older than this are excluded
    pub days_back: i64,
}

impl NewsQuery {
    /// A query for `keywords` with everything else from config defaults
    pub fn for_keywords(keywords: impl Into<String>, config: &NewsConfig) -> Self {
        Self {
            keywords: keywords.into(),
            language: config.language.clone(),
            sort_by: config.sort_by.clone(),
            page_size: config.page_size,
            days_back: config.days_back,
        }
    }
}

/// Start of the lookback window, formatted for the API
fn window_start(today: NaiveDate, days_back: i64) -> String {
    (today - chrono::Duration::days(days_back))
        .format("%Y-%m-%d")
        .to_string()
}

pub struct NewsApi {
    api_key: String,
    api_base: String,
    client: reqwest::Client,
}

impl NewsApi {
    pub fn new(api_key: impl Into<String>, config: &NewsConfig) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: config.api_base.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the client with the key from `NEWSAPI_KEY`
    pub fn from_env(config: &NewsConfig) -> Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(ConfigError::MissingVar(API_KEY_VAR.to_string()).into()),
        };
        Ok(Self::new(api_key, config))
    }
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

#[async_trait]
impl NewsProvider for NewsApi {
    async fn suggestions(&self, query: &NewsQuery) -> Result<Vec<NewsSuggestion>> {
        let from = window_start(chrono::Utc::now().date_naive(), query.days_back);
        debug!(keywords = %query.keywords, %from, "fetching news suggestions");

        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("q", query.keywords.as_str()),
                ("from", from.as_str()),
                ("sortBy", query.sort_by.as_str()),
                ("language", query.language.as_str()),
                ("apiKey", self.api_key.as_str()),
                ("pageSize", &query.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::News(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::News(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::News(format!(
                "news lookup returned status {}: {}",
                status, body
            ))
            .into());
        }

        let parsed: NewsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::News(format!("unexpected response: {}", e)))?;

        let suggestions = parsed
            .articles
            .into_iter()
            .filter_map(|article| {
                // An article without a title or URL is useless as a suggestion
                let title = article.title?;
                let url = article.url?;
                Some(NewsSuggestion {
                    title,
                    description: article.description,
                    url,
                    source: article.source.and_then(|s| s.name),
                })
            })
            .collect();

        Ok(suggestions)
    }
}

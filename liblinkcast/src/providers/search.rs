//! Google Custom Search context provider
//!
//! Turns the top search results for a topic into a plain-text context
//! block for prompt assembly. An empty result set is not an error; the
//! generator just works from a placeholder context instead.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::SearchProvider;
use crate::config::SearchConfig;
use crate::error::{ConfigError, ProviderError, Result};

/// Environment variable holding the Custom Search API key
pub const API_KEY_VAR: &str = "SEARCH_API_KEY";
/// Environment variable holding the Programmable Search Engine id
pub const ENGINE_ID_VAR: &str = "SEARCH_ENGINE_ID";

pub struct GoogleSearch {
    api_key: String,
    engine_id: String,
    api_base: String,
    num_results: u32,
    client: reqwest::Client,
}

impl GoogleSearch {
    pub fn new(
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            api_base: config.api_base.clone(),
            num_results: config.num_results,
            client: reqwest::Client::new(),
        }
    }

    /// Build the client from `SEARCH_API_KEY` and `SEARCH_ENGINE_ID`
    pub fn from_env(config: &SearchConfig) -> Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = require_var(API_KEY_VAR)?;
        let engine_id = require_var(ENGINE_ID_VAR)?;
        Ok(Self::new(api_key, engine_id, config))
    }
}

fn require_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name.to_string()).into()),
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

fn format_context(topic: &str, items: &[SearchItem]) -> String {
    if items.is_empty() {
        return format!("No relevant information found for '{}'.", topic);
    }

    let mut context = String::new();
    for item in items {
        context.push_str(&format!(
            "Title: {}\nSummary: {}\nLink: {}\n\n",
            item.title, item.snippet, item.link
        ));
    }
    context
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(&self, topic: &str) -> Result<String> {
        debug!(topic, num = self.num_results, "searching for context");

        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", topic),
                ("num", &self.num_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Search(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Search(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Search(format!(
                "search returned status {}: {}",
                status, body
            ))
            .into());
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Search(format!("unexpected response: {}", e)))?;

        Ok(format_context(topic, &parsed.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_blocks() {
        let items = vec![
            SearchItem {
                title: "First".to_string(),
                snippet: "A summary".to_string(),
                link: "https://a.test".to_string(),
            },
            SearchItem {
                title: "Second".to_string(),
                snippet: "Another".to_string(),
                link: "https://b.test".to_string(),
            },
        ];

        let context = format_context("topic", &items);
        assert!(context.contains("Title: First\nSummary: A summary\nLink: https://a.test\n\n"));
        assert!(context.contains("Title: Second"));
    }

    #[test]
    fn test_format_context_empty_results_is_placeholder() {
        let context = format_context("obscure topic", &[]);
        assert_eq!(context, "No relevant information found for 'obscure topic'.");
    }

    #[test]
    fn test_search_response_tolerates_missing_items() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_search_response_tolerates_partial_items() {
        let body = r#"{"items":[{"title":"Only title"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items[0].title, "Only title");
        assert_eq!(parsed.items[0].snippet, "");
    }
}

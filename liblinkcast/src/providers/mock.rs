//! Mock providers for exercising the drafting pipeline
//!
//! Configurable doubles for every provider trait. Each records how many
//! times it was called and what it was called with, so tests can verify
//! pipeline ordering and short-circuiting without network access or
//! credentials. Available for all builds so integration tests can use
//! them.

use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};

use super::{GeneratedImage, ImageGenerator, NewsProvider, SearchProvider, TextGenerator};
use crate::error::{ProviderError, Result};
use crate::providers::news::NewsQuery;
use crate::types::NewsSuggestion;

/// Search double returning a fixed context string
#[derive(Clone)]
pub struct MockSearch {
    context: String,
    error: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSearch {
    pub fn returning(context: &str) -> Self {
        Self {
            context: context.to_string(),
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            context: String::new(),
            error: Some(error.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Topics this mock was asked about, in order
    pub fn topics(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, topic: &str) -> Result<String> {
        self.calls.lock().unwrap().push(topic.to_string());
        match &self.error {
            Some(error) => Err(ProviderError::Search(error.clone()).into()),
            None => Ok(self.context.clone()),
        }
    }
}

/// Text generator double returning fixed content
#[derive(Clone)]
pub struct MockTextGenerator {
    content: String,
    error: Option<String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTextGenerator {
    pub fn returning(content: &str) -> Self {
        Self {
            content: content.to_string(),
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            content: String::new(),
            error: Some(error.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// (topic, context) pairs this mock was called with, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, topic: &str, context: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((topic.to_string(), context.to_string()));
        match &self.error {
            Some(error) => Err(ProviderError::TextGeneration(error.clone()).into()),
            None => Ok(self.content.clone()),
        }
    }
}

/// Image generator double staging a small real file per call
#[derive(Clone)]
pub struct MockImageGenerator {
    error: Option<String>,
    calls: Arc<Mutex<usize>>,
}

impl MockImageGenerator {
    pub fn succeeding() -> Self {
        Self {
            error: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, _topic: &str) -> Result<GeneratedImage> {
        *self.calls.lock().unwrap() += 1;

        if let Some(error) = &self.error {
            return Err(ProviderError::ImageGeneration(error.clone()).into());
        }

        // A real file on disk, so downstream probing and cleanup paths
        // behave as in production
        let mut file = tempfile::Builder::new()
            .prefix("linkcast-mock-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;
        file.write_all(b"\x89PNG\r\n\x1a\nmock")
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;
        let (_, path) = file
            .keep()
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;

        Ok(GeneratedImage { url: None, path })
    }
}

/// News double returning fixed suggestions
#[derive(Clone)]
pub struct MockNews {
    suggestions: Vec<NewsSuggestion>,
    error: Option<String>,
    calls: Arc<Mutex<usize>>,
}

impl MockNews {
    pub fn returning(suggestions: Vec<NewsSuggestion>) -> Self {
        Self {
            suggestions,
            error: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            suggestions: Vec::new(),
            error: Some(error.to_string()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl NewsProvider for MockNews {
    async fn suggestions(&self, _query: &NewsQuery) -> Result<Vec<NewsSuggestion>> {
        *self.calls.lock().unwrap() += 1;
        match &self.error {
            Some(error) => Err(ProviderError::News(error.clone()).into()),
            None => Ok(self.suggestions.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::error::LinkcastError;

    #[tokio::test]
    async fn test_mock_search_records_topics() {
        let search = MockSearch::returning("some context");

        let context = search.search("rust").await.unwrap();
        assert_eq!(context, "some context");
        assert_eq!(search.call_count(), 1);
        assert_eq!(search.topics(), vec!["rust"]);
    }

    #[tokio::test]
    async fn test_mock_search_failure() {
        let search = MockSearch::failing("quota exceeded");

        let result = search.search("rust").await;
        match result {
            Err(LinkcastError::Provider(ProviderError::Search(msg))) => {
                assert_eq!(msg, "quota exceeded");
            }
            _ => panic!("Expected search error"),
        }
        assert_eq!(search.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_text_generator_records_inputs() {
        let generator = MockTextGenerator::returning("post body");

        let content = generator.generate("topic", "context").await.unwrap();
        assert_eq!(content, "post body");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "topic");
        assert_eq!(calls[0].1, "context");
    }

    #[tokio::test]
    async fn test_mock_image_generator_stages_real_file() {
        let generator = MockImageGenerator::succeeding();

        let image = generator.generate("topic").await.unwrap();
        assert!(image.path.exists());
        assert!(std::fs::metadata(&image.path).unwrap().len() > 0);

        std::fs::remove_file(&image.path).ok();
    }

    #[tokio::test]
    async fn test_mock_news_returns_suggestions() {
        let news = MockNews::returning(vec![NewsSuggestion {
            title: "Headline".to_string(),
            description: None,
            url: "https://news.test".to_string(),
            source: None,
        }]);

        let query = NewsQuery::for_keywords("ai", &NewsConfig::default());
        let suggestions = news.suggestions(&query).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(news.call_count(), 1);
    }
}

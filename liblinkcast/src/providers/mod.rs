//! Content provider abstractions
//!
//! The drafting pipeline talks to its upstream services through these
//! traits: a web search for background context, a text generator for the
//! post body, an image generator for the visual, and a news feed for
//! topic suggestions. Each has one production implementation and a mock
//! double in [`mock`] for exercising the pipeline without credentials
//! or network access.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::NewsSuggestion;

pub mod mock;
pub mod news;
pub mod openai;
pub mod search;

pub use self::news::{NewsApi, NewsQuery};
pub use self::openai::{OpenAiImage, OpenAiText};
pub use self::search::GoogleSearch;

/// A generated image staged on local disk
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Remote URL the image was fetched from, when there is one
    pub url: Option<String>,
    /// Local file holding the image bytes. The file persists until the
    /// caller discards it.
    pub path: std::path::PathBuf,
}

/// Gathers background context about a topic.
///
/// Returns a formatted context block for prompt assembly. Finding
/// nothing is not an error; implementations return a placeholder
/// context instead.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, topic: &str) -> Result<String>;
}

/// Drafts post text from a topic and its search context.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, topic: &str, context: &str) -> Result<String>;
}

/// Produces an accompanying image for a topic, staged to a local file.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<GeneratedImage>;
}

/// Retrieves recent headlines matching a query, for topic discovery.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn suggestions(&self, query: &NewsQuery) -> Result<Vec<NewsSuggestion>>;
}

//! OpenAI text and image generation
//!
//! Two thin clients over the OpenAI HTTP API: chat completions for the
//! post body and the images endpoint for the visual. The generated
//! image is downloaded and staged into a temp file that outlives the
//! call; discarding it is the caller's decision (see
//! [`crate::composer::discard_image`]).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GeneratedImage, ImageGenerator, TextGenerator};
use crate::config::OpenAiConfig;
use crate::error::{ConfigError, ProviderError, Result};

/// Environment variable holding the OpenAI API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const SYSTEM_PROMPT: &str =
    "You are an expert in digital marketing and LinkedIn content creation.";

fn text_prompt(topic: &str, context: &str) -> String {
    format!(
        "Write a professional LinkedIn post about: {topic}.\n\
         The post must:\n\
         1. Have 3 medium-length paragraphs (no more than 3-4 sentences each)\n\
         2. Be informative and engaging for a professional audience\n\
         3. Include a relevant fact or statistic\n\
         4. End with a question or call to action\n\
         5. Stay under 1500 characters in total\n\
         Use this information as context:\n\
         {context}\n\
         Output: only the post text, with no titles or extra labels."
    )
}

fn image_prompt(topic: &str) -> String {
    format!(
        "A professional, eye-catching image for a LinkedIn post about {topic}. \
         Corporate style, high quality, suitable for a professional network."
    )
}

fn api_key_from_env() -> Result<String> {
    dotenvy::dotenv().ok();
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingVar(API_KEY_VAR.to_string()).into()),
    }
}

/// Chat-completion client drafting post text
pub struct OpenAiText {
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    client: reqwest::Client,
}

impl OpenAiText {
    pub fn new(api_key: impl Into<String>, config: &OpenAiConfig) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client: reqwest::Client::new(),
        }
    }

    /// Build the client with the key from `OPENAI_API_KEY`
    pub fn from_env(config: &OpenAiConfig) -> Result<Self> {
        Ok(Self::new(api_key_from_env()?, config))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl TextGenerator for OpenAiText {
    async fn generate(&self, topic: &str, context: &str) -> Result<String> {
        debug!(model = %self.model, "requesting post text");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": text_prompt(topic, context)},
                ],
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::TextGeneration(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::TextGeneration(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::TextGeneration(format!(
                "chat completion returned status {}: {}",
                status, body
            ))
            .into());
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::TextGeneration(format!("unexpected response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::TextGeneration("response contained no choices".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

/// Image-generation client staging the result to a temp file
pub struct OpenAiImage {
    api_key: String,
    api_base: String,
    model: String,
    size: String,
    client: reqwest::Client,
}

impl OpenAiImage {
    pub fn new(api_key: impl Into<String>, config: &OpenAiConfig) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the client with the key from `OPENAI_API_KEY`
    pub fn from_env(config: &OpenAiConfig) -> Result<Self> {
        Ok(Self::new(api_key_from_env()?, config))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::ImageGeneration(format!(
                "image download returned status {}",
                response.status()
            ))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: String,
}

#[async_trait]
impl ImageGenerator for OpenAiImage {
    async fn generate(&self, topic: &str) -> Result<GeneratedImage> {
        debug!(model = %self.model, size = %self.size, "requesting image");

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": image_prompt(topic),
                "size": self.size,
                "quality": "standard",
                "n": 1,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ImageGeneration(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::ImageGeneration(format!(
                "image generation returned status {}: {}",
                status, body
            ))
            .into());
        }

        let parsed: ImagesResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ImageGeneration(format!("unexpected response: {}", e)))?;

        let url = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| {
                ProviderError::ImageGeneration("response contained no images".to_string())
            })?;

        let bytes = self.download(&url).await?;

        let file = tempfile::Builder::new()
            .prefix("linkcast-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ProviderError::ImageGeneration(format!("staging failed: {}", e)))?;

        std::fs::write(file.path(), &bytes)
            .map_err(|e| ProviderError::ImageGeneration(format!("staging failed: {}", e)))?;

        // Persist past the handle; the composer's caller owns cleanup
        let (_, path) = file
            .keep()
            .map_err(|e| ProviderError::ImageGeneration(format!("staging failed: {}", e)))?;

        debug!(path = %path.display(), bytes = bytes.len(), "image staged");

        Ok(GeneratedImage {
            url: Some(url),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_embeds_topic_and_context() {
        let prompt = text_prompt("rust in production", "Title: X\nSummary: Y");
        assert!(prompt.contains("rust in production"));
        assert!(prompt.contains("Title: X"));
        assert!(prompt.contains("1500 characters"));
        assert!(prompt.contains("question or call to action"));
    }

    #[test]
    fn test_image_prompt_embeds_topic() {
        let prompt = image_prompt("quantum computing");
        assert!(prompt.contains("quantum computing"));
        assert!(prompt.contains("LinkedIn"));
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  post text  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "  post text  ");
    }

    #[test]
    fn test_images_response_parsing() {
        let body = r#"{"created":1,"data":[{"url":"https://img.test/1.png"}]}"#;
        let parsed: ImagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data[0].url, "https://img.test/1.png");
    }
}

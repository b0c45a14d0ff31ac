//! Configuration management for Linkcast
//!
//! Non-secret settings live in a TOML file resolved per the XDG spec;
//! secrets stay in the environment (see [`crate::credentials`]). Every
//! section has working defaults so the tools run without a config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub linkedin: LinkedInConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInConfig {
    /// Base URL of the LinkedIn REST API
    pub api_base: String,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.linkedin.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_base: String,
    /// Chat model used for drafting post text
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Image model used for the accompanying visual
    pub image_model: String,
    pub image_size: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_base: String,
    /// How many search results feed the drafting context
    pub num_results: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/customsearch/v1".to_string(),
            num_results: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    pub api_base: String,
    pub language: String,
    pub sort_by: String,
    pub page_size: u32,
    /// Width of the lookback window for suggestions, in days
    pub days_back: i64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://newsapi.org/v2/everything".to_string(),
            language: "en".to_string(),
            sort_by: "popularity".to_string(),
            page_size: 10,
            days_back: 30,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Resolve the configuration file path following the XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("LINKCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("linkcast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.linkedin.api_base, "https://api.linkedin.com");
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.image_size, "1024x1024");
        assert_eq!(config.search.num_results, 5);
        assert_eq!(config.news.days_back, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "[openai]\napi_base = \"https://api.openai.com\"\nmodel = \"gpt-4o-mini\"\n\
             max_tokens = 500\ntemperature = 0.5\nimage_model = \"dall-e-3\"\nimage_size = \"1024x1024\""
        )
        .expect("Failed to write");

        let config =
            Config::load_from_path(&file.path().to_path_buf()).expect("Config should parse");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 500);
        // Untouched sections keep their defaults
        assert_eq!(config.linkedin.api_base, "https://api.linkedin.com");
        assert_eq!(config.news.language, "en");
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path(&PathBuf::from("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "this is not toml {{").expect("Failed to write");

        let result = Config::load_from_path(&file.path().to_path_buf());
        match result {
            Err(crate::LinkcastError::Config(ConfigError::ParseError(_))) => {}
            _ => panic!("Expected parse error"),
        }
    }
}

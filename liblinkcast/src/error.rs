//! Error types for Linkcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkcastError>;

#[derive(Error, Debug)]
pub enum LinkcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LinkcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LinkcastError::InvalidInput(_) | LinkcastError::Config(_) => 3,
            LinkcastError::Publish(e) if e.is_auth() => 2,
            LinkcastError::Publish(_) => 1,
            LinkcastError::Provider(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Author lookup failed: {0}")]
    Discovery(String),
}

/// Failures of the three-step LinkedIn publication sequence.
///
/// Each step has its own variant carrying the HTTP status and the raw
/// response body so operators can diagnose the failing call directly.
/// All variants are terminal for the current publication attempt; the
/// sequence is never resumed mid-way because upload sessions are
/// single-use.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The upload-initiation call came back 2xx but without an upload
    /// URL or asset identifier. A protocol violation, kept distinct
    /// from plain HTTP failures.
    #[error("Upload initiation response missing uploadUrl or image: {body}")]
    MalformedUploadResponse { body: String },

    #[error("Upload initiation failed with status {status}: {body}")]
    UploadInitiationFailed { status: u16, body: String },

    #[error("Binary upload failed with status {status}: {body}")]
    BinaryUploadFailed { status: u16, body: String },

    #[error("Post creation failed with status {status}: {body}")]
    PostCreationFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Image asset rejected: {0}")]
    Asset(String),
}

impl PublishError {
    /// The HTTP status of the failing call, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::UploadInitiationFailed { status, .. }
            | PublishError::BinaryUploadFailed { status, .. }
            | PublishError::PostCreationFailed { status, .. } => Some(*status),
            PublishError::MalformedUploadResponse { .. }
            | PublishError::Network(_)
            | PublishError::Asset(_) => None,
        }
    }

    /// The raw response body of the failing call, when one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            PublishError::MalformedUploadResponse { body }
            | PublishError::UploadInitiationFailed { body, .. }
            | PublishError::BinaryUploadFailed { body, .. }
            | PublishError::PostCreationFailed { body, .. } => Some(body),
            PublishError::Network(_) | PublishError::Asset(_) => None,
        }
    }

    fn is_auth(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Search failed: {0}")]
    Search(String),

    #[error("News lookup failed: {0}")]
    News(String),

    #[error("Text generation failed: {0}")]
    TextGeneration(String),

    #[error("Image generation failed: {0}")]
    ImageGeneration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = LinkcastError::InvalidInput("Empty caption".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = LinkcastError::Config(ConfigError::MissingVar(
            "LINKEDIN_ACCESS_TOKEN".to_string(),
        ));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_auth_failure() {
        let error = LinkcastError::Publish(PublishError::UploadInitiationFailed {
            status: 401,
            body: "token expired".to_string(),
        });
        assert_eq!(error.exit_code(), 2);

        let error = LinkcastError::Publish(PublishError::PostCreationFailed {
            status: 403,
            body: "forbidden".to_string(),
        });
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_non_auth_publish_failure() {
        let error = LinkcastError::Publish(PublishError::BinaryUploadFailed {
            status: 500,
            body: "server error".to_string(),
        });
        assert_eq!(error.exit_code(), 1);

        let error = LinkcastError::Publish(PublishError::MalformedUploadResponse {
            body: "{}".to_string(),
        });
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_provider_error() {
        let error = LinkcastError::Provider(ProviderError::TextGeneration(
            "model unavailable".to_string(),
        ));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_publish_error_carries_status_and_body() {
        let error = PublishError::PostCreationFailed {
            status: 422,
            body: "{\"message\":\"unprocessable\"}".to_string(),
        };
        assert_eq!(error.status(), Some(422));
        assert_eq!(error.body(), Some("{\"message\":\"unprocessable\"}"));
    }

    #[test]
    fn test_malformed_response_has_body_but_no_status() {
        let error = PublishError::MalformedUploadResponse {
            body: "{\"value\":{}}".to_string(),
        };
        assert_eq!(error.status(), None);
        assert_eq!(error.body(), Some("{\"value\":{}}"));
    }

    #[test]
    fn test_error_message_formatting_publish() {
        let error = LinkcastError::Publish(PublishError::BinaryUploadFailed {
            status: 503,
            body: "unavailable".to_string(),
        });
        assert_eq!(
            format!("{}", error),
            "Publish error: Binary upload failed with status 503: unavailable"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = LinkcastError::Config(ConfigError::MissingVar("NEWSAPI_KEY".to_string()));
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required environment variable: NEWSAPI_KEY"
        );
    }

    #[test]
    fn test_error_conversion_from_publish_error() {
        let publish_error = PublishError::Network("connection refused".to_string());
        let error: LinkcastError = publish_error.into();

        match error {
            LinkcastError::Publish(PublishError::Network(msg)) => {
                assert_eq!(msg, "connection refused");
            }
            _ => panic!("Expected LinkcastError::Publish"),
        }
    }

    #[test]
    fn test_error_conversion_from_provider_error() {
        let provider_error = ProviderError::Search("quota exceeded".to_string());
        let error: LinkcastError = provider_error.into();

        match error {
            LinkcastError::Provider(_) => {}
            _ => panic!("Expected LinkcastError::Provider"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<&'static str> {
            Ok("success")
        }

        fn returns_err() -> Result<&'static str> {
            Err(LinkcastError::InvalidInput("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}

//! LinkedIn credential loading
//!
//! Credentials come from the environment (a `.env` file is honored),
//! never from the config file. Loading fails fast, naming the first
//! missing variable, so a misconfigured process dies before any network
//! call is made.

use crate::error::{ConfigError, Result};

/// Environment variable holding the OAuth bearer token
pub const ACCESS_TOKEN_VAR: &str = "LINKEDIN_ACCESS_TOKEN";
/// Environment variable holding the publishing entity's URN
pub const AUTHOR_URN_VAR: &str = "LINKEDIN_AUTHOR_URN";
/// Environment variable overriding the API version header
pub const API_VERSION_VAR: &str = "LINKEDIN_API_VERSION";

/// Default `LinkedIn-Version` header value (year+month)
pub const DEFAULT_API_VERSION: &str = "202504";

/// Immutable LinkedIn credentials for one process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth bearer token
    pub access_token: String,
    /// URN of the person or organization posting (e.g. `urn:li:person:...`)
    pub author_urn: String,
    /// API revision sent as the `LinkedIn-Version` header, 6 digits
    pub api_version: String,
}

impl Credentials {
    /// Build credentials, validating each field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the author URN is not in
    /// URN form or the API version is not six ASCII digits, and
    /// `ConfigError::MissingField` if the token is empty.
    pub fn new(
        access_token: impl Into<String>,
        author_urn: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        let access_token = access_token.into();
        let author_urn = author_urn.into();
        let api_version = api_version.into();

        if access_token.trim().is_empty() {
            return Err(ConfigError::MissingField("access_token".to_string()).into());
        }

        if !author_urn.starts_with("urn:li:") {
            return Err(ConfigError::InvalidValue {
                field: "author_urn".to_string(),
                reason: format!("expected a urn:li:... identifier, got '{}'", author_urn),
            }
            .into());
        }

        if api_version.len() != 6 || !api_version.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "api_version".to_string(),
                reason: format!("expected six digits (year+month), got '{}'", api_version),
            }
            .into());
        }

        Ok(Self {
            access_token,
            author_urn,
            api_version,
        })
    }

    /// Load credentials from the environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// `LINKEDIN_API_VERSION` is optional and defaults to
    /// [`DEFAULT_API_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` naming the first absent or
    /// empty required variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let access_token = require_var(ACCESS_TOKEN_VAR)?;
        let author_urn = require_var(AUTHOR_URN_VAR)?;
        let api_version = match std::env::var(API_VERSION_VAR) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => DEFAULT_API_VERSION.to_string(),
        };

        Self::new(access_token, author_urn, api_version)
    }
}

fn require_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name.to_string()).into()),
    }
}

/// Resolve the author URN for an access token via the OpenID userinfo
/// endpoint.
///
/// A setup-time helper: the token's subject id is the person id the
/// `LINKEDIN_AUTHOR_URN` variable should carry. Unlike the `/rest/`
/// surface, `/v2/userinfo` wants only the bearer token — no version
/// headers.
///
/// # Errors
///
/// Returns `ConfigError::Discovery` when the endpoint rejects the token
/// or the response has no subject field.
pub async fn discover_author_urn(access_token: &str, api_base: &str) -> Result<String> {
    let url = format!("{}/v2/userinfo", api_base.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .get(&url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| ConfigError::Discovery(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ConfigError::Discovery(e.to_string()))?;

    if !status.is_success() {
        return Err(ConfigError::Discovery(format!(
            "userinfo returned status {}: {}",
            status, body
        ))
        .into());
    }

    author_urn_from_userinfo(&body)
}

fn author_urn_from_userinfo(body: &str) -> Result<String> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ConfigError::Discovery(format!("unexpected response: {}", e)))?;

    match parsed.get("sub").and_then(serde_json::Value::as_str) {
        Some(sub) if !sub.is_empty() => Ok(format!("urn:li:person:{}", sub)),
        _ => Err(ConfigError::Discovery(
            "response contained no subject id".to_string(),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkcastError;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ACCESS_TOKEN_VAR);
        std::env::remove_var(AUTHOR_URN_VAR);
        std::env::remove_var(API_VERSION_VAR);
    }

    #[test]
    fn test_new_valid() {
        let creds = Credentials::new("token-abc", "urn:li:person:xyz", "202504")
            .expect("Valid credentials should build");
        assert_eq!(creds.access_token, "token-abc");
        assert_eq!(creds.author_urn, "urn:li:person:xyz");
        assert_eq!(creds.api_version, "202504");
    }

    #[test]
    fn test_new_accepts_organization_urn() {
        let creds = Credentials::new("token", "urn:li:organization:123", "202504");
        assert!(creds.is_ok());
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = Credentials::new("  ", "urn:li:person:xyz", "202504");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_non_urn_author() {
        let result = Credentials::new("token", "person-xyz", "202504");
        match result {
            Err(LinkcastError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "author_urn");
            }
            _ => panic!("Expected invalid value error for author_urn"),
        }
    }

    #[test]
    fn test_new_rejects_bad_api_version() {
        for bad in ["2025", "2025-04", "april", "20254x"] {
            let result = Credentials::new("token", "urn:li:person:xyz", bad);
            match result {
                Err(LinkcastError::Config(ConfigError::InvalidValue { field, .. })) => {
                    assert_eq!(field, "api_version", "version '{}' should be rejected", bad);
                }
                _ => panic!("Expected invalid value error for version '{}'", bad),
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_env_missing_token() {
        clear_env();

        let result = Credentials::from_env();
        match result {
            Err(LinkcastError::Config(ConfigError::MissingVar(name))) => {
                assert_eq!(name, ACCESS_TOKEN_VAR);
            }
            _ => panic!("Expected missing variable error"),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_missing_author_urn() {
        clear_env();
        std::env::set_var(ACCESS_TOKEN_VAR, "token");

        let result = Credentials::from_env();
        match result {
            Err(LinkcastError::Config(ConfigError::MissingVar(name))) => {
                assert_eq!(name, AUTHOR_URN_VAR);
            }
            _ => panic!("Expected missing variable error"),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_api_version() {
        clear_env();
        std::env::set_var(ACCESS_TOKEN_VAR, "token");
        std::env::set_var(AUTHOR_URN_VAR, "urn:li:person:xyz");

        let creds = Credentials::from_env().expect("Credentials should load");
        assert_eq!(creds.api_version, DEFAULT_API_VERSION);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_respects_api_version_override() {
        clear_env();
        std::env::set_var(ACCESS_TOKEN_VAR, "token");
        std::env::set_var(AUTHOR_URN_VAR, "urn:li:person:xyz");
        std::env::set_var(API_VERSION_VAR, "202601");

        let creds = Credentials::from_env().expect("Credentials should load");
        assert_eq!(creds.api_version, "202601");

        clear_env();
    }

    #[test]
    fn test_author_urn_from_userinfo() {
        let body = r#"{"sub":"a1b2c3","name":"Test Person","locale":"en-US"}"#;
        let urn = author_urn_from_userinfo(body).expect("Valid userinfo should resolve");
        assert_eq!(urn, "urn:li:person:a1b2c3");
    }

    #[test]
    fn test_author_urn_from_userinfo_missing_sub() {
        let result = author_urn_from_userinfo(r#"{"name":"Test Person"}"#);
        match result {
            Err(LinkcastError::Config(ConfigError::Discovery(msg))) => {
                assert!(msg.contains("no subject id"));
            }
            _ => panic!("Expected discovery error"),
        }
    }

    #[test]
    fn test_author_urn_from_userinfo_non_json() {
        let result = author_urn_from_userinfo("<html>sign in</html>");
        match result {
            Err(LinkcastError::Config(ConfigError::Discovery(msg))) => {
                assert!(msg.contains("unexpected response"));
            }
            _ => panic!("Expected discovery error"),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_trims_whitespace() {
        clear_env();
        std::env::set_var(ACCESS_TOKEN_VAR, "  token  ");
        std::env::set_var(AUTHOR_URN_VAR, " urn:li:person:xyz ");

        let creds = Credentials::from_env().expect("Credentials should load");
        assert_eq!(creds.access_token, "token");
        assert_eq!(creds.author_urn, "urn:li:person:xyz");

        clear_env();
    }
}

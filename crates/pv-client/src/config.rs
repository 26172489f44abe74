use std::{fmt, time::Duration};

use serde::Deserialize;

use crate::error::ClientError;

/// Prefix of every environment variable read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "PV_";

pub const DEFAULT_API_BASE_URL: &str = "https://signal-app-748522437054.us-central1.run.app";

/// Deployment flavour; selects the log format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Settings for the client and the `pvctl` binary.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub environment: Environment,
    /// Token from an earlier login; skips the login round trip
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    /// Load from `PV_*` environment variables, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// Load from explicit `PV_*` key/value pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(pairs)?)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Login credentials, when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() => Some((email, password)),
            _ => None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("environment", &self.environment)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_pairs(Vec::new()).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.environment, Environment::Development);
        assert!(config.access_token.is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = ClientConfig::from_pairs(pairs(&[
            ("PV_API_BASE_URL", "http://localhost:5000"),
            ("PV_REQUEST_TIMEOUT_SECS", "5"),
            ("PV_ENVIRONMENT", "production"),
            ("PV_EMAIL", "admin@clinic.org"),
            ("PV_PASSWORD", "Secret123!"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.environment.is_development());
        assert_eq!(config.credentials(), Some(("admin@clinic.org", "Secret123!")));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(ClientConfig::from_pairs(pairs(&[("PV_REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ClientConfig::from_pairs(pairs(&[("PV_ENVIRONMENT", "staging")])).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::from_pairs(pairs(&[
            ("PV_ACCESS_TOKEN", "tok-123"),
            ("PV_PASSWORD", "Secret123!"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("tok-123"));
        assert!(!rendered.contains("Secret123!"));
    }
}

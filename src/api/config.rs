//! Endpoint and timeout configuration for the API clients. Values come from
//! hardcoded fallbacks, optionally overridden by environment variables, so a
//! deployment can point at another backend without rebuilding. Configuration
//! values are public; do not store secrets here.

use super::errors::ApiError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/v1/";
pub const DEFAULT_CSRF_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_API_BASE_URL: &str = "GRUPI_API_BASE_URL";
pub const ENV_CSRF_BASE_URL: &str = "GRUPI_API_BASE_URL_CSRF";
pub const ENV_API_TIMEOUT: &str = "GRUPI_API_TIMEOUT";

/// Client configuration shared by the credentialed API client and the
/// secondary client used to bootstrap the anti-forgery cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_base_url: Url,
    pub csrf_base_url: Url,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default API URL is valid")),
            csrf_base_url: Url::parse(DEFAULT_CSRF_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default CSRF URL is valid")),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Builds a config from explicit values.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if a URL is not absolute http(s) or the timeout is zero.
    pub fn new(api_base_url: &str, csrf_base_url: &str, timeout_ms: u64) -> Result<Self, ApiError> {
        if timeout_ms == 0 {
            return Err(ApiError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            csrf_base_url: parse_base_url(csrf_base_url)?,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Loads the defaults and applies `GRUPI_*` environment overrides.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if an override is present but invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let read = |key: &str| lookup(key).as_deref().and_then(normalize_value);

        let api_base_url =
            read(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let csrf_base_url =
            read(ENV_CSRF_BASE_URL).unwrap_or_else(|| DEFAULT_CSRF_BASE_URL.to_string());
        let timeout_ms = match read(ENV_API_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|err| {
                ApiError::Config(format!("invalid {ENV_API_TIMEOUT} value {raw:?}: {err}"))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Self::new(&api_base_url, &csrf_base_url, timeout_ms)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ApiError::Config(format!("invalid base URL {raw:?}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::Config(format!(
            "invalid base URL {raw:?}: unsupported scheme {scheme}"
        ))),
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

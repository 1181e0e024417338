//! HTTP client layer for the GruPI REST API. Requests go through one
//! credentialed client with a fixed timeout and JSON content negotiation;
//! state-changing requests get the anti-forgery token attached, bootstrapping
//! it first when the cookie is missing. Safe requests never carry the token.
//!
//! Non-2xx responses, transport failures and timeouts all reject the call with
//! an `ApiError`. Nothing is retried.

pub mod config;
pub mod csrf;
pub mod errors;

pub use config::ApiConfig;
pub use csrf::{CookieCredentials, CredentialProvider};
pub use errors::ApiError;

use reqwest::{
    cookie::Jar,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Maximum number of error body characters kept in `ApiError::Http` messages.
const MAX_ERROR_CHARS: usize = 200;

/// Credentialed JSON client for the API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient<P = CookieCredentials> {
    http: Client,
    base_url: Url,
    credentials: P,
}

impl ApiClient<CookieCredentials> {
    /// Builds the API client and the cookie-backed credential provider over a
    /// fresh in-memory cookie jar.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if either HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let credentials = CookieCredentials::new(config, Arc::clone(&jar))?;
        Self::with_credentials(config, jar, credentials)
    }
}

impl<P: CredentialProvider> ApiClient<P> {
    /// Builds the API client around an explicit credential provider.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be constructed.
    pub fn with_credentials(
        config: &ApiConfig,
        jar: Arc<Jar>,
        credentials: P,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http: http_client(config, jar)?,
            base_url: config.api_base_url.clone(),
            credentials,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn credentials(&self) -> &P {
        &self.credentials
    }

    /// Sends `method path` with an optional JSON body and decodes the JSON
    /// response. An empty success body decodes as `null`.
    ///
    /// # Errors
    /// Returns `ApiError` on encoding, transport, timeout, non-2xx or decoding
    /// failures.
    #[instrument(skip(self, body))]
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(method, path, body).await?;
        decode_json(&body)
    }

    /// Sends `method path` and only checks the status; any 2xx body, JSON
    /// or not, is discarded.
    ///
    /// # Errors
    /// Returns `ApiError` on encoding, transport, timeout or non-2xx failures.
    #[instrument(skip(self, body))]
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body).await.map(|_| ())
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = build_url_with_base(self.base_url.as_str(), path);
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))?;

        let mut builder = self.http.request(method.clone(), &url);

        if is_unsafe(&method) {
            match self.credentials.ensure_token().await {
                Some(token) => {
                    debug!("attaching anti-forgery token");
                    builder = self.credentials.attach(builder, &token);
                }
                None => warn!("anti-forgery token unavailable, sending without it"),
            }
        }

        if let Some(payload) = payload {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = builder.send().await.map_err(|err| {
            error!(%url, error = %err, "request failed");
            map_request_error(err)
        })?;

        handle_response(&method, &url, response).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Posts without a body, e.g. to end the session.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::POST, path, None).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }
}

/// Methods with create/update/delete semantics; these carry the token.
#[must_use]
pub fn is_unsafe(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Builds a reqwest client that shares `jar` and applies the configured timeout.
pub(crate) fn http_client(config: &ApiConfig, jar: Arc<Jar>) -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .default_headers(headers)
        .cookie_provider(jar)
        .timeout(config.timeout)
        .build()
        .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))
}

/// Joins an explicit base URL and a path with exactly one slash between them.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Config(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_response(
    method: &Method,
    url: &str,
    response: Response,
) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_request_error)?;

    if status.is_success() {
        debug!(%method, %url, %status, "request succeeded");
        return Ok(body.to_vec());
    }

    let payload = serde_json::from_slice::<Value>(&body).ok();
    let message = sanitize_body(&String::from_utf8_lossy(&body));
    error!(%method, %url, %status, %message, "request rejected");

    Err(ApiError::Http {
        status: status.as_u16(),
        payload,
        message,
    })
}

/// Decodes a success body; blank bodies decode as `null`.
fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

/// Trims and truncates error bodies kept for display.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

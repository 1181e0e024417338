//! Anti-forgery token handling. The backend issues the token as a `csrftoken`
//! cookie on safe requests and expects it echoed back in the `X-CSRFToken`
//! header on state-changing ones. `CredentialProvider` separates that policy
//! (attach on unsafe methods, bootstrap when missing) from the cookie
//! mechanism implemented by `CookieCredentials`.
//!
//! The token value is never logged, only whether it is present.

use super::{build_url_with_base, config::ApiConfig, errors::ApiError, http_client};
use reqwest::{
    cookie::{CookieStore, Jar},
    Client, RequestBuilder,
};
use std::{future::Future, sync::Arc};
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

/// Cookie the backend uses to issue the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header the token is echoed in on state-changing requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Safe endpoints, relative to the CSRF base URL, probed in order until one
/// answers with a 2xx.
pub const PROBE_PATHS: [&str; 3] = ["/csrf/", "/api/v1/", "/api/v1/auth/user/"];

/// Capability for reading, attaching and refreshing the anti-forgery token.
pub trait CredentialProvider: Send + Sync {
    /// Current token, if the backend has issued one.
    fn read_token(&self) -> Option<String>;

    /// Best-effort request(s) that make the backend issue a token.
    /// Failures are logged and swallowed.
    fn refresh(&self) -> impl Future<Output = ()> + Send;

    /// Puts the token on an outgoing request.
    fn attach(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(CSRF_HEADER, token)
    }

    /// Returns the token, running one refresh first when it is missing.
    fn ensure_token(&self) -> impl Future<Output = Option<String>> + Send {
        async move {
            if let Some(token) = self.read_token() {
                debug!("anti-forgery token already present");
                return Some(token);
            }

            debug!("anti-forgery token missing, bootstrapping");
            self.refresh().await;
            self.read_token()
        }
    }
}

/// Cookie-jar backed provider. The jar is shared with the credentialed API
/// client, so the session cookie and the token cookie travel with every
/// request; this type only reads the jar.
#[derive(Clone)]
pub struct CookieCredentials {
    jar: Arc<Jar>,
    cookie_url: Url,
    csrf_base_url: Url,
    probe: Client,
}

impl CookieCredentials {
    /// Builds the provider and its secondary (probe) client over `jar`.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the probe client cannot be constructed.
    pub fn new(config: &ApiConfig, jar: Arc<Jar>) -> Result<Self, ApiError> {
        let probe = http_client(config, Arc::clone(&jar))?;

        Ok(Self {
            jar,
            cookie_url: config.api_base_url.clone(),
            csrf_base_url: config.csrf_base_url.clone(),
            probe,
        })
    }

    #[must_use]
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    async fn bootstrap(&self) {
        let mut header_hint = false;

        for path in PROBE_PATHS {
            let url = build_url_with_base(self.csrf_base_url.as_str(), path);
            match self.probe.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(%url, status = %response.status(), "anti-forgery probe answered");
                    header_hint = response.headers().contains_key(CSRF_HEADER);
                    break;
                }
                Ok(response) => {
                    debug!(%url, status = %response.status(), "anti-forgery probe rejected");
                }
                Err(err) => {
                    debug!(%url, error = %err, "anti-forgery probe failed");
                }
            }
        }

        if self.read_token().is_some() {
            info!("anti-forgery token obtained from cookie");
            return;
        }

        warn!(
            "backend did not set the {CSRF_COOKIE} cookie; check its cookie \
             SameSite/Secure/domain settings and that CORS allows credentials"
        );
        if header_hint {
            warn!(
                "backend sent the token in a {CSRF_HEADER} response header only; \
                 it is not copied into the cookie jar"
            );
        }
    }
}

impl std::fmt::Debug for CookieCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieCredentials")
            .field("cookie_url", &self.cookie_url.as_str())
            .field("csrf_base_url", &self.csrf_base_url.as_str())
            .field("token_present", &self.read_token().is_some())
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for CookieCredentials {
    fn read_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.cookie_url)?;
        let cookies = header.to_str().ok()?;
        find_cookie(cookies, CSRF_COOKIE)
    }

    fn refresh(&self) -> impl Future<Output = ()> + Send {
        let span = info_span!("csrf.bootstrap", base = %self.csrf_base_url);
        self.bootstrap().instrument(span)
    }
}

/// Finds `name` in a `Cookie` header value and percent-decodes it.
pub(crate) fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| {
                urlencoding::decode(value.trim())
                    .map_or_else(|_| value.trim().to_string(), |decoded| decoded.into_owned())
            })
        })
        .filter(|value| !value.is_empty())
}

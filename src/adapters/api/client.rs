//! REST client for the hospital backend
//!
//! [`ApiClient`] owns the HTTP client and the session context. Every request
//! built through [`ApiClient::request`] carries the current bearer token, and
//! every response passes through one status check: `401` becomes
//! [`ApiError::AuthExpired`], any other failure becomes a client or server
//! error carrying the backend's message.

use crate::config::ApiConfig;
use crate::core::session::SessionContext;
use crate::domain::{ApiError, IntakeError, Result};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const FALLBACK_MESSAGE: &str = "Request failed";

/// HTTP client for the backend REST API
///
/// Cloning is cheap; clones share the connection pool and session.
///
/// # Example
///
/// ```no_run
/// use intake::adapters::api::ApiClient;
/// use intake::config::ApiConfig;
/// use intake::core::session::SessionContext;
///
/// # fn example() -> intake::domain::Result<()> {
/// let client = ApiClient::new(&ApiConfig::default(), SessionContext::anonymous())?;
/// assert_eq!(client.base_url(), "http://localhost:4000/api");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            IntakeError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session context requests read their token from
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a request carrying the current bearer token, if any
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorize(self.client.request(method, self.url(path)))
    }

    /// Builds a request for an already resolved URL
    pub(crate) fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        self.authorize(self.client.request(method, url))
    }

    /// Builds a request without credentials
    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer() {
            Some(bearer) => request.header(reqwest::header::AUTHORIZATION, bearer),
            None => request,
        }
    }

    /// Sends a request made on behalf of the session
    ///
    /// A `401` from any endpoint is reported as [`ApiError::AuthExpired`].
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Response, ApiError> {
        let response = dispatch(request).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url().path(), "Backend rejected the session token");
            return Err(ApiError::AuthExpired);
        }
        ensure_success(response).await
    }

    /// Sends a request made before any session exists, such as login
    ///
    /// A `401` here is an ordinary client error.
    pub(crate) async fn send_anonymous(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Response, ApiError> {
        let response = dispatch(request).await?;
        ensure_success(response).await
    }
}

async fn dispatch(request: RequestBuilder) -> std::result::Result<Response, ApiError> {
    request.send().await.map_err(|e| {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else {
            ApiError::ConnectionFailed(e.to_string())
        }
    })
}

async fn ensure_success(response: Response) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let fallback = status.canonical_reason().unwrap_or(FALLBACK_MESSAGE);
    let message = error_message(&body, fallback);

    tracing::debug!(status = status.as_u16(), message = %message, "Backend returned an error");

    if status.is_server_error() {
        Err(ApiError::ServerError {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(ApiError::ClientError {
            status: status.as_u16(),
            message,
        })
    }
}

/// Decodes a JSON response body
pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
) -> std::result::Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Picks the message shown for a failed response
///
/// Uses the body's `message`, then its `error`, then `fallback`, and
/// finally a generic text when `fallback` is blank.
pub fn error_message(body: &str, fallback: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });

    from_body.unwrap_or_else(|| {
        let fallback = fallback.trim();
        if fallback.is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            fallback.to_string()
        }
    })
}

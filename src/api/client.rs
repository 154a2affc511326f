//! HTTP client for the catalog service
//!
//! Every call is awaited to completion before the caller issues the next one;
//! there is no retry and no timeout beyond the configured transport default.

use std::time::Duration;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::common::config::ServiceConfig;
use crate::common::{Error, Result};

/// Status code and raw body of a completed request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Whether the service answered 200 OK
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Whether the body denotes a missing entity: empty or literal `null`
    pub fn is_absent(&self) -> bool {
        let body = self.body.trim();
        body.is_empty() || body == "null"
    }

    /// Parse the body as untyped JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::assertion(format!(
                "Response content is not valid JSON ({}): {}",
                e,
                preview(&self.body)
            ))
        })
    }

    /// Parse the body into a typed value
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::assertion(format!(
                "Response content has unexpected shape ({}): {}",
                e,
                preview(&self.body)
            ))
        })
    }
}

fn preview(body: &str) -> String {
    if body.len() > 200 {
        let cut = (0..=200).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

/// Client bound to one catalog base URL
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl CatalogClient {
    /// Build a client for the configured service
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = normalize_base(&config.base_url)?;

        let mut builder = reqwest::Client::builder().user_agent("catalog-e2e");
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Attach the bearer token sent with mutating calls
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether a bearer token is attached
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve an endpoint path against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| Error::InvalidBaseUrl(format!("{}{}", self.base_url, path)))
    }

    /// GET without authorization
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, false).await
    }

    /// Authorized POST with a JSON body
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(serde_json::to_value(body)?), true)
            .await
    }

    /// POST with a JSON body and no authorization (login)
    pub async fn post_anonymous<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(serde_json::to_value(body)?), false)
            .await
    }

    /// Authorized PUT with a JSON body
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::PUT, path, Some(serde_json::to_value(body)?), true)
            .await
    }

    /// Authorized DELETE
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::DELETE, path, None, true).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        authorize: bool,
    ) -> Result<ApiResponse> {
        let url = self.url(path)?;
        let mut request = self.http.request(method.clone(), url);

        if authorize {
            match &self.token {
                Some(token) => request = request.bearer_auth(token),
                None => tracing::warn!(%method, path, "Sending mutating request without a token"),
            }
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(method.as_str(), path, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(method.as_str(), path, e))?;

        tracing::debug!(%method, path, status, bytes = body.len(), "Request completed");

        Ok(ApiResponse { status, body })
    }
}

/// Parse the base URL, ensuring relative joins append to its path
fn normalize_base(raw: &str) -> Result<Url> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let url = Url::parse(&base).map_err(|_| Error::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

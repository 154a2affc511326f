//! Bearer token acquisition

use async_trait::async_trait;
use serde::Serialize;

use super::client::CatalogClient;
use crate::common::config::AuthConfig;
use crate::common::{Error, Result};

/// Source of the bearer token used for mutating calls
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Obtain a token
    async fn token(&self, client: &CatalogClient) -> Result<String>;
}

/// A token issued out-of-band
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticToken {
    fn describe(&self) -> String {
        "static token".to_string()
    }

    async fn token(&self, _client: &CatalogClient) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Logs in with fixed credentials and reads the token from the response
pub struct LoginAuth {
    email: String,
    password: String,
    login_path: String,
    token_field: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl LoginAuth {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            email: config.email.clone(),
            password: config.password.clone(),
            login_path: config.login_path.clone(),
            token_field: config.token_field.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for LoginAuth {
    fn describe(&self) -> String {
        format!("login as {}", self.email)
    }

    async fn token(&self, client: &CatalogClient) -> Result<String> {
        let response = client
            .post_anonymous(
                &self.login_path,
                &LoginRequest {
                    email: &self.email,
                    password: &self.password,
                },
            )
            .await?;

        if !response.is_ok() {
            return Err(Error::Auth(format!(
                "login as '{}' returned status {}",
                self.email, response.status
            )));
        }

        let body = response
            .json()
            .map_err(|e| Error::Auth(format!("login response unreadable: {}", e)))?;

        body.get(&self.token_field)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Auth(format!(
                    "login response has no string field '{}'",
                    self.token_field
                ))
            })
    }
}

/// Pick the provider for a configuration: a pre-issued token wins over login
pub fn provider_for(config: &AuthConfig) -> Box<dyn AuthProvider> {
    match &config.token {
        Some(token) => Box::new(StaticToken::new(token.clone())),
        None => Box::new(LoginAuth::new(config)),
    }
}

/// Obtain a token and attach it to the client
///
/// Fails when the provider yields an empty token.
pub async fn authenticate(
    client: CatalogClient,
    provider: &dyn AuthProvider,
) -> Result<CatalogClient> {
    tracing::debug!(provider = %provider.describe(), "Authenticating");

    let token = provider.token(&client).await?;
    if token.trim().is_empty() {
        return Err(Error::Auth(
            "Authentication token should not be null or empty".to_string(),
        ));
    }

    Ok(client.with_token(token))
}

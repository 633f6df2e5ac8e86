//! User directory access.
//!
//! `UserDirectory` is the seam between the resolver and the remote API so the
//! resolver can be exercised against an in-process directory.

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::users::DiscordUser;

/// Source of raw user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches one user by id. Non-success responses are [`AppError::Upstream`].
    async fn fetch_user(&self, id: &str) -> Result<DiscordUser>;
}

/// Discord REST client authenticating with a bot token.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
}

impl DiscordClient {
    /// `http` should already carry the outbound timeout.
    pub fn new(http: Client, api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserDirectory for DiscordClient {
    async fn fetch_user(&self, id: &str) -> Result<DiscordUser> {
        let url = format!("{}/users/{}", self.api_base, id);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await
            .map_err(|e| AppError::transport(describe_transport(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        response
            .json::<DiscordUser>()
            .await
            .map_err(|e| AppError::transport(format!("invalid user payload: {}", e)))
    }
}

fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

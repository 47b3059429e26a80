//! Per-attempt HTTP client bound to one dialer choice
//!
//! One `AttemptClient` is built for each login attempt and threaded through
//! the handshake and the whole task cycle for that identity. The dialer
//! selection never lives in shared process state.

use crate::config::{ApiConfig, PuzzleConfig};
use anyhow::{Context, Result};
use core_logic::{NetworkError, ProxyDescriptor};
use reqwest::{Client, Proxy};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

pub struct AttemptClient {
    http: Client,
    api: ApiConfig,
    proxy_url: Option<String>,
}

impl AttemptClient {
    /// Builds a client for one attempt, routed through `dialer` when given.
    ///
    /// An unsupported proxy scheme is logged and the client falls back to a
    /// direct connection.
    pub fn build(config: &PuzzleConfig, dialer: Option<&ProxyDescriptor>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timing.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.timing.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5);

        let mut proxy_url = None;
        if let Some(descriptor) = dialer {
            match descriptor.kind() {
                Ok(_) => {
                    let proxy =
                        Proxy::all(&descriptor.url).context("Failed to create proxy dialer")?;
                    builder = builder.proxy(proxy);
                    proxy_url = Some(descriptor.url.clone());
                }
                Err(e) => warn!("{}; falling back to direct connection", e),
            }
        }

        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api: config.api.clone(),
            proxy_url,
        })
    }

    /// The proxy URL this attempt is routed through, if any.
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    /// `POST /api/v1/siwe/init` on the auth host.
    pub async fn siwe_init(&self, body: &Value) -> Result<Value> {
        let url = format!(
            "{}/api/v1/siwe/init",
            self.api.auth_base_url.trim_end_matches('/')
        );
        self.post_auth(&url, body).await
    }

    /// `POST /api/v1/siwe/authenticate` on the auth host.
    pub async fn siwe_authenticate(&self, body: &Value) -> Result<Value> {
        let url = format!(
            "{}/api/v1/siwe/authenticate",
            self.api.auth_base_url.trim_end_matches('/')
        );
        self.post_auth(&url, body).await
    }

    async fn post_auth(&self, url: &str, body: &Value) -> Result<Value> {
        let request = self
            .http
            .post(url)
            .header("User-Agent", &self.api.user_agent)
            .header("privy-app-id", &self.api.privy_app_id)
            .header("privy-ca-id", &self.api.privy_ca_id)
            .header("privy-client", &self.api.privy_client)
            .header("Origin", &self.api.site_origin)
            .header("Referer", format!("{}/", self.api.site_origin))
            .json(body);
        Self::dispatch(url, request).await
    }

    /// GraphQL-style POST against the campaign endpoint. Authenticated calls
    /// pass the platform session token as `bearer`.
    pub async fn graphql(
        &self,
        operation: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<Value> {
        let url = self.api.campaign_url.clone();
        let mut request = self
            .http
            .post(&url)
            .header("origin", &self.api.site_origin)
            .header("x-apollo-operation-name", operation)
            .json(body);
        if let Some(token) = bearer {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        Self::dispatch(&url, request).await
    }

    async fn dispatch(url: &str, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(NetworkError::RateLimited {
                endpoint: url.to_string(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: url.to_string(),
            }
            .into());
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| {
                NetworkError::InvalidResponse {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

impl std::fmt::Debug for AttemptClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptClient")
            .field("proxy_url", &self.proxy_url)
            .finish_non_exhaustive()
    }
}

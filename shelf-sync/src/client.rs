#![doc = "HTTP transport for the ESL price-sync service: implements the core `EslTransport` contract with reqwest."]
//
//! # Price-sync client (CLI <-> Core)
//!
//! Wires the [`EslTransport`] trait from `shelf-sync-core` to the real service:
//!
//! - `POST {base}/proxy/token` with HTTP Basic auth and no body
//! - `POST {base}/proxy/integration/{customerCode}/{storeCode}` with a bearer
//!   token and the batch payload as JSON
//!
//! Each call is a single attempt with its own timeout. The client only reports
//! what the server said; deciding whether a status is a failure is the core's job.

use async_trait::async_trait;
use reqwest::Url;
use shelf_sync_core::contract::{AuthToken, BatchPayload, EslTransport, HttpReply, TransportError};
use std::time::Duration;

use crate::load_config::{ApiConfig, Credentials};

pub struct EslClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    token_timeout: Duration,
    upload_timeout: Duration,
}

impl EslClient {
    pub fn new(api: &ApiConfig, credentials: Credentials) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            tracing::error!(error = ?e, "Failed to build HTTP client");
            e
        })?;
        let base_url = Url::parse(api.base_url.trim_end_matches('/')).map_err(|e| {
            tracing::error!(error = %e, base_url = %api.base_url, "Invalid base URL");
            e
        })?;
        if base_url.cannot_be_a_base() {
            return Err(format!("base URL {base_url} cannot carry a path").into());
        }
        tracing::info!(
            base_url = %api.base_url,
            token_timeout_secs = api.token_timeout_secs,
            upload_timeout_secs = api.upload_timeout_secs,
            "Initialized EslClient"
        );
        Ok(Self {
            http,
            base_url,
            credentials,
            token_timeout: api.token_timeout(),
            upload_timeout: api.upload_timeout(),
        })
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| format!("base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn token_url(&self) -> Result<Url, TransportError> {
        self.endpoint(&["proxy", "token"])
    }

    fn integration_url(&self, payload: &BatchPayload) -> Result<Url, TransportError> {
        self.endpoint(&[
            "proxy",
            "integration",
            payload.customer_store_code.as_str(),
            payload.store_code.as_str(),
        ])
    }
}

async fn into_reply(response: reqwest::Response) -> Result<HttpReply, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(HttpReply { status, body })
}

#[async_trait]
impl EslTransport for EslClient {
    async fn request_token(&self) -> Result<HttpReply, TransportError> {
        let url = self.token_url()?;
        tracing::debug!(url = %url, "Requesting token");

        let response = self
            .http
            .post(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .timeout(self.token_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Token request failed to complete");
                e
            })?;

        into_reply(response).await
    }

    async fn post_batch(
        &self,
        token: &AuthToken,
        payload: &BatchPayload,
    ) -> Result<HttpReply, TransportError> {
        let url = self.integration_url(payload)?;
        tracing::debug!(url = %url, items = payload.items.len(), "Posting batch");

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token.secret())
            .json(payload)
            .timeout(self.upload_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Batch request failed to complete");
                e
            })?;

        into_reply(response).await
    }
}

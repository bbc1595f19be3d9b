//! # contract: the seam between the pipeline and the price-sync service
//!
//! The core never talks HTTP directly. It hands requests to an [`EslTransport`]
//! and judges the raw [`HttpReply`] itself, so status handling, token
//! extraction and batch fail-fast logic can be exercised with mocks.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockEslTransport` is exported under
//!   `cfg(test)` and the default-on `test-export-mocks` feature.
//! - The binary crate provides the real `reqwest` implementation.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::transform::SyncRecord;

/// Connection-level failure (DNS, TLS, timeout). The request never produced a status.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Status and body of a completed HTTP exchange, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Bearer credential for one file's upload cycle. Never logged, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// JSON body of one upload request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub customer_store_code: String,
    pub store_code: String,
    pub batch_no: String,
    pub items: Vec<SyncRecord>,
}

/// Transport to the ESL price-sync service.
///
/// Implementations perform exactly one request per call: no retries, no token
/// caching. The customer/store path segments of the upload URL come from the
/// payload itself.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait EslTransport: Send + Sync {
    /// Exchange the configured static credentials for a bearer token.
    async fn request_token(&self) -> Result<HttpReply, TransportError>;

    /// Post one batch of records using the given bearer token.
    async fn post_batch(
        &self,
        token: &AuthToken,
        payload: &BatchPayload,
    ) -> Result<HttpReply, TransportError>;
}

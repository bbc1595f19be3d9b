use serde::Deserialize;
use tracing::{error, info};

use crate::contract::{AuthToken, EslTransport};
use crate::error::{SyncError, SyncResult};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Fetch a fresh bearer token. One attempt, no caching: every file gets its own.
pub async fn acquire_token<T>(transport: &T) -> SyncResult<AuthToken>
where
    T: EslTransport + ?Sized,
{
    let reply = transport.request_token().await.map_err(|e| {
        error!(error = %e, "Token request did not complete");
        SyncError::Auth {
            status: None,
            reason: e.to_string(),
        }
    })?;

    if !reply.is_success() {
        error!(status = reply.status, body = %reply.body, "Token request rejected");
        return Err(SyncError::Auth {
            status: Some(reply.status),
            reason: reply.body,
        });
    }

    let parsed: TokenResponse = serde_json::from_str(&reply.body).map_err(|e| {
        error!(error = %e, "Token response did not contain an access_token");
        SyncError::Auth {
            status: Some(reply.status),
            reason: format!("unreadable token response: {e}"),
        }
    })?;

    info!("Token obtained successfully");
    Ok(AuthToken::new(parsed.access_token))
}

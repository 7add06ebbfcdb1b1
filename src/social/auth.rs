use super::backend::BackendClient;
use crate::action::{ActionSlot, ActionState};
use crate::host::MiniAppHost;
use crate::DemoError;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Claims of a quick-auth token, decoded without verification for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedToken {
    pub claims: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Decode the payload segment of a JWT
///
/// `iat` / `exp` are also rendered as RFC 3339 timestamps.
pub fn decode_token(token: &str) -> Result<DecodedToken, DemoError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| DemoError::failed("Token is not a JWT"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| DemoError::failed(format!("Token payload is not base64url: {}", e)))?;
    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| DemoError::failed(format!("Token payload is not JSON: {}", e)))?;

    let timestamp = |name: &str| {
        claims
            .get(name)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
    };

    Ok(DecodedToken {
        issued_at: timestamp("iat"),
        expires_at: timestamp("exp"),
        claims,
    })
}

/// Sign-in with a quick-auth token
///
/// Success carries the fid the backend verified the token for.
pub struct QuickAuthPanel {
    host: Arc<MiniAppHost>,
    backend: BackendClient,
    token: RwLock<Option<String>>,
    sign_in: ActionSlot<u64>,
}

impl QuickAuthPanel {
    pub fn new(host: Arc<MiniAppHost>, backend: BackendClient) -> Self {
        Self {
            host,
            backend,
            token: RwLock::new(None),
            sign_in: ActionSlot::new("quick auth sign in"),
        }
    }

    /// Get a token from the host, then hit the authenticated endpoint
    ///
    /// Rejections end as "Rejected by user"; every other failure as
    /// "Unknown error" (the cause is logged).
    pub async fn sign_in(&self) -> ActionState<u64> {
        self.sign_in
            .run(async {
                let result = async {
                    let token = self.host.quick_auth().await?;
                    *self.token.write().await = Some(token.clone());
                    self.backend.me(&token).await
                }
                .await;

                result.map_err(|e| {
                    if e.is_user_rejection() {
                        e
                    } else {
                        warn!("sign in failed: {}", e);
                        DemoError::failed(UNKNOWN_ERROR)
                    }
                })
            })
            .await
    }

    pub async fn sign_out(&self) {
        *self.token.write().await = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Claims of the current token
    pub async fn decoded(&self) -> Option<Result<DecodedToken, DemoError>> {
        self.token.read().await.as_deref().map(decode_token)
    }
}

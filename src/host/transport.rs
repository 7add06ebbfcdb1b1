use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel to the host client
///
/// Implementations forward `method` and its JSON `params` to the host and
/// return the host's JSON answer. Host-side failures come back as
/// [`HostError`].
#[async_trait]
pub trait HostTransport: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostErrorKind {
    /// The user dismissed the host's confirmation sheet
    RejectedByUser,
    /// The host could not validate this app's domain manifest
    InvalidDomainManifest,
    /// The host does not implement the requested action
    Unsupported,
    /// Request or response could not be (de)serialized
    Malformed,
    /// The channel itself failed
    Transport,
}

/// Failure reported by (or while talking to) the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    pub kind: HostErrorKind,
    pub message: String,
}

impl HostError {
    pub fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rejected_by_user(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::RejectedByUser, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Malformed, message)
    }
}

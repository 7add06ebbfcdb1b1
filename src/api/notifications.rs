//! Notification Delivery Module
//!
//! Sends one notification to the URL and token the host handed out when the
//! user enabled notifications.

use crate::host::NotificationDetails;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification token is invalid")]
    InvalidToken,
}

/// Accepted outcomes of a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    RateLimited,
}

/// Content of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Opened when the user taps the notification
    pub target_url: String,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, details: &NotificationDetails, notification: &Notification)
        -> Result<SendOutcome, NotifyError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationRequest<'a> {
    notification_id: Uuid,
    title: &'a str,
    body: &'a str,
    target_url: &'a str,
    tokens: [&'a str; 1],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationResult {
    #[serde(default)]
    invalid_tokens: Vec<String>,
    #[serde(default)]
    rate_limited_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SendNotificationResponse {
    #[serde(default)]
    result: SendNotificationResult,
}

/// Delivers notifications over HTTP with `reqwest`
#[derive(Clone, Default)]
pub struct HttpNotificationSender {
    client: reqwest::Client,
}

impl HttpNotificationSender {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    async fn send(
        &self,
        details: &NotificationDetails,
        notification: &Notification,
    ) -> Result<SendOutcome, NotifyError> {
        let request = SendNotificationRequest {
            notification_id: Uuid::new_v4(),
            title: &notification.title,
            body: &notification.body,
            target_url: &notification.target_url,
            tokens: [&details.token],
        };
        info!("Sending notification {} to {}", request.notification_id, details.url);

        let response = self.client.post(&details.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Notification service answered {}: {}", status, body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let result = response.json::<SendNotificationResponse>().await?.result;
        if result.rate_limited_tokens.contains(&details.token) {
            return Ok(SendOutcome::RateLimited);
        }
        if result.invalid_tokens.contains(&details.token) {
            return Err(NotifyError::InvalidToken);
        }
        Ok(SendOutcome::Sent)
    }
}

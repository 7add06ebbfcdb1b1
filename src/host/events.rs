use super::types::{MiniAppContext, NotificationDetails};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Event pushed by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    MiniAppAdded {
        #[serde(rename = "notificationDetails", default)]
        notification_details: Option<NotificationDetails>,
    },
    MiniAppAddRejected {
        reason: String,
    },
    MiniAppRemoved,
    NotificationsEnabled {
        #[serde(rename = "notificationDetails")]
        notification_details: NotificationDetails,
    },
    NotificationsDisabled,
    PrimaryButtonClicked,
}

/// Live listener on a host's events
pub struct EventSubscription {
    receiver: broadcast::Receiver<HostEvent>,
}

impl EventSubscription {
    pub(super) fn new(receiver: broadcast::Receiver<HostEvent>) -> Self {
        Self { receiver }
    }

    /// Next event, or `None` once the host is gone
    ///
    /// A subscriber that fell behind skips the events it missed.
    pub async fn next(&mut self) -> Option<HostEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!("event subscription lagged, skipped {} events", missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// What the app knows about its standing with the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSession {
    pub client_fid: u64,
    pub added: bool,
    pub notification_details: Option<NotificationDetails>,
    pub last_event: Option<String>,
}

impl HostSession {
    pub fn from_context(context: &MiniAppContext) -> Self {
        Self {
            client_fid: context.client.client_fid,
            added: context.client.added,
            notification_details: context.client.notification_details.clone(),
            last_event: None,
        }
    }

    pub fn apply(&mut self, event: &HostEvent) {
        match event {
            HostEvent::MiniAppAdded { notification_details } => {
                self.last_event = Some(format!(
                    "miniAppAdded{}",
                    if notification_details.is_some() { ", notifications enabled" } else { "" }
                ));
                self.added = true;
                if let Some(details) = notification_details {
                    self.notification_details = Some(details.clone());
                }
            }
            HostEvent::MiniAppAddRejected { reason } => {
                self.last_event = Some(format!("miniAppAddRejected, reason {}", reason));
            }
            HostEvent::MiniAppRemoved => {
                self.last_event = Some("miniAppRemoved".to_string());
                self.added = false;
                self.notification_details = None;
            }
            HostEvent::NotificationsEnabled { notification_details } => {
                self.last_event = Some("notificationsEnabled".to_string());
                self.notification_details = Some(notification_details.clone());
            }
            HostEvent::NotificationsDisabled => {
                self.last_event = Some("notificationsDisabled".to_string());
                self.notification_details = None;
            }
            HostEvent::PrimaryButtonClicked => debug!("primaryButtonClicked"),
        }
    }

    /// One-line status, e.g. "Client fid 9152, frame added to client,
    /// notifications enabled"
    pub fn summary(&self) -> String {
        format!(
            "Client fid {},{}{}",
            self.client_fid,
            if self.added { " frame added to client," } else { " frame not added to client," },
            if self.notification_details.is_some() {
                " notifications enabled"
            } else {
                " notifications disabled"
            }
        )
    }
}

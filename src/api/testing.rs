//! In-memory verifier and notification sender for tests

use super::{Notification, NotificationSender, NotifyError, SendOutcome};
use crate::host::NotificationDetails;
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every notification and answers with a fixed outcome
pub(crate) struct RecordingSender {
    outcome: fn() -> Result<SendOutcome, NotifyError>,
    sent: Mutex<Vec<(NotificationDetails, Notification)>>,
}

impl RecordingSender {
    pub(crate) fn answering(outcome: fn() -> Result<SendOutcome, NotifyError>) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<(NotificationDetails, Notification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(
        &self,
        details: &NotificationDetails,
        notification: &Notification,
    ) -> Result<SendOutcome, NotifyError> {
        self.sent.lock().unwrap().push((details.clone(), notification.clone()));
        (self.outcome)()
    }
}


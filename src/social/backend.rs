use crate::config::join_under;
use crate::host::NotificationDetails;
use crate::DemoError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

#[derive(Deserialize)]
struct MeResponse {
    fid: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationBody<'a> {
    fid: u64,
    notification_details: &'a NotificationDetails,
}

/// Client for this app's own HTTP backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, DemoError> {
        join_under(&self.base_url, path)
            .map_err(|e| DemoError::failed(format!("invalid backend url: {}", e)))
    }

    /// `GET /api/me` with `token` as bearer; returns the verified fid
    pub async fn me(&self, token: &str) -> Result<u64, DemoError> {
        let response = self
            .http
            .get(self.endpoint("api/me")?)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("/api/me answered {}", response.status());
            return Err(DemoError::failed("Network response was not ok"));
        }
        Ok(response.json::<MeResponse>().await?.fid)
    }

    /// `POST /api/send-notification`; returns the result line to display
    ///
    /// Transport failures are rendered as `Error: ...` too.
    pub async fn send_notification(&self, fid: u64, details: &NotificationDetails) -> Result<String, DemoError> {
        let body = SendNotificationBody {
            fid,
            notification_details: details,
        };
        let sent = self
            .http
            .post(self.endpoint("api/send-notification")?)
            .json(&body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return Ok(format!("Error: {}", e)),
        };

        let result = match response.status() {
            StatusCode::OK => "Success".to_string(),
            StatusCode::TOO_MANY_REQUESTS => "Rate limited".to_string(),
            _ => format!("Error: {}", response.text().await.unwrap_or_default()),
        };
        info!("send-notification for fid {}: {}", fid, result);
        Ok(result)
    }
}

//! API Server Module
//!
//! This module implements the HTTP backend of the mini-app. It verifies
//! quick-auth bearer tokens, relays test notifications to the host's
//! notification service and serves the discovery document.

use super::manifest::{self, Manifest};
use super::{ApiError, Notification, NotificationSender, SendOutcome, TokenVerifier};
use crate::config::Config;
use crate::host::NotificationDetails;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state that is accessible across all request handlers
///
/// - `config`: public URL, notification content and manifest data
/// - `verifier`: checks quick-auth bearer tokens
/// - `notifier`: delivers notifications to the host's service
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    verifier: Arc<dyn TokenVerifier>,
    notifier: Arc<dyn NotificationSender>,
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Arc<Config>,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, public URL, ...)
    /// * `verifier` - Quick-auth token verifier used by `/api/me`
    /// * `notifier` - Notification sender used by `/api/send-notification`
    ///
    /// # Returns
    /// A new `Server` instance with initialized components
    pub fn new(
        config: Config,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            verifier,
            notifier,
        };

        Self { config, state }
    }

    /// Builds the axum router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/me", get(handle_me))
            .route("/api/send-notification", post(handle_send_notification))
            .route("/.well-known/farcaster.json", get(handle_manifest))
            .with_state(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server shuts down, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MeResponse {
    fid: u64,
}

/// Handles `GET /api/me`
///
/// Verifies the bearer token and answers with the fid it was issued for.
///
/// # Returns
/// * `200 {fid}` for a valid token
/// * `401 {message}` when the header is missing or the token fails
///   verification
async fn handle_me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>, ApiError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingAuthorization)?;

    let token = authorization
        .strip_prefix("Bearer ")
        .unwrap_or(authorization)
        .trim();

    let fid = state.verifier.verify(token).await.map_err(|e| {
        warn!("Rejected /api/me token: {}", e);
        ApiError::from(e)
    })?;
    info!("GET /api/me for fid {}", fid);

    Ok(Json(MeResponse { fid }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationBody {
    fid: u64,
    notification_details: NotificationDetails,
}

/// Handles `POST /api/send-notification`
///
/// Sends the configured test notification to the details in the body.
///
/// # Returns
/// * `200 {success: true}` once delivered
/// * `400` when the body is not `{fid, notificationDetails: {url, token}}`
/// * `429` when the host rate-limits the token
/// * `500 {success: false, error}` for any other delivery failure
async fn handle_send_notification(
    State(state): State<AppState>,
    body: Result<Json<SendNotificationBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    info!("POST /api/send-notification for fid {}", body.fid);

    let notification = Notification {
        title: state.config.notifications.title.clone(),
        body: state.config.notifications.body.clone(),
        target_url: state.config.app.home_url(),
    };

    match state.notifier.send(&body.notification_details, &notification).await? {
        SendOutcome::Sent => Ok(Json(json!({ "success": true }))),
        SendOutcome::RateLimited => {
            warn!("Notification for fid {} rate limited", body.fid);
            Err(ApiError::RateLimited)
        }
    }
}

/// Handles `GET /.well-known/farcaster.json`
async fn handle_manifest(State(state): State<AppState>) -> Result<Json<Manifest>, ApiError> {
    manifest::build(&state.config)
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("invalid manifest url: {}", e)))
}

//! API Module
//!
//! HTTP backend of the mini-app: the authenticated `/api/me` endpoint, the
//! send-notification relay and the discovery document.
//!
//! # Components
//! - **Server**: axum router and listener
//! - **TokenVerifier**: quick-auth bearer token verification
//! - **NotificationSender**: delivery of notifications to the host's service
//! - **manifest**: the `/.well-known/farcaster.json` document

mod auth;
mod error;
pub mod manifest;
mod notifications;
mod server;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, QuickAuthVerifier, SigningKey, TokenVerifier};
pub use error::ApiError;
pub use notifications::{HttpNotificationSender, Notification, NotificationSender, NotifyError, SendOutcome};
pub use server::{AppState, Server};

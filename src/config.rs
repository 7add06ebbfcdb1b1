//! Configuration Module
//!
//! This module defines all configuration structures for the mini-app demo.
//! Configuration is loaded from TOML files and parsed using serde.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `app.public_url`
pub const PUBLIC_URL_ENV: &str = "MINIAPP_PUBLIC_URL";

/// Main configuration structure
///
/// Contains all configuration sections for the demo backend and clients.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 3000
///
/// [app]
/// public_url = "https://farcaster-demo-ten.vercel.app"
///
/// [wallet]
/// rpc_url = "http://127.0.0.1:8545"
/// poll_interval_ms = 200
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    pub manifest: ManifestConfig,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 3000)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Public deployment settings
///
/// `public_url` is the absolute base URL the mini-app is served from. Every
/// link in the discovery document is joined onto it, and its hostname is the
/// audience quick-auth tokens must be issued for.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub public_url: Url,
}

impl AppConfig {
    /// `public_url` without a trailing slash, as shown to the host
    pub fn home_url(&self) -> String {
        self.public_url.as_str().trim_end_matches('/').to_string()
    }

    /// Absolute link to `path` below `public_url`
    pub fn link(&self, path: &str) -> Result<Url, url::ParseError> {
        join_under(&self.public_url, path)
    }
}

/// Join `path` onto `base` as a child of the whole base path
///
/// `Url::join` drops the last segment of a base that does not end in `/`,
/// so `https://host/demo` + `icon.png` would lose `demo`.
pub fn join_under(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
}

/// Quick-auth token verification settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim
    pub issuer: String,
    /// Where the issuer publishes its signing keys
    pub jwks_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://auth.farcaster.xyz".to_string(),
            jwks_url: "https://auth.farcaster.xyz/.well-known/jwks.json".to_string(),
        }
    }
}

/// Wallet JSON-RPC settings used by the batch-call driver
///
/// # Fields
/// - `rpc_url`: EIP-1193 compatible wallet endpoint
/// - `poll_interval_ms`: Interval between `wallet_getCallsStatus` polls
/// - `status_timeout_ms`: Optional upper bound on the status wait. Unset means
///   the wait is unbounded and relies on the wallet to resolve the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub rpc_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub status_timeout_ms: Option<u64>,
}

fn default_poll_interval_ms() -> u64 {
    200
}

impl WalletConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn status_timeout(&self) -> Option<Duration> {
        self.status_timeout_ms.map(Duration::from_millis)
    }
}

/// Content of the test notification sent by `/api/send-notification`
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub title: String,
    pub body: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "Hello from Frames v2!".to_string(),
            body: "This is a test notification".to_string(),
        }
    }
}

/// Discovery document settings
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestConfig {
    pub account_association: AccountAssociationConfig,
    pub frame: FrameConfig,
}

/// Signed statement binding the domain to a custody key
#[derive(Debug, Clone, Deserialize)]
pub struct AccountAssociationConfig {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

/// Mini-app descriptor
///
/// Path fields (`icon_path`, `image_path`, ...) are relative to
/// `app.public_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameConfig {
    pub name: String,
    #[serde(default = "default_frame_version")]
    pub version: String,
    pub icon_path: String,
    pub image_path: String,
    pub splash_image_path: String,
    pub splash_background_color: String,
    pub webhook_path: String,
    pub subtitle: String,
    pub description: String,
    pub primary_category: String,
}

fn default_frame_version() -> String {
    "1".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// After parsing, `MINIAPP_PUBLIC_URL` (if set) replaces `app.public_url`.
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read, the TOML is invalid, or the
    ///   override is not an absolute URL
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        let mut config = Self::from_toml(&content)?;

        if let Ok(public_url) = std::env::var(PUBLIC_URL_ENV) {
            config.app.public_url = Url::parse(&public_url)
                .with_context(|| format!("{} is not a valid url", PUBLIC_URL_ENV))?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Hostname that quick-auth tokens must be issued for
    pub fn auth_domain(&self) -> anyhow::Result<String> {
        self.app
            .public_url
            .host_str()
            .map(str::to_string)
            .context("app.public_url has no host")
    }
}

#[cfg(test)]
pub(crate) const TEST_CONFIG: &str = r##"
[api]
host = "127.0.0.1"
port = 3000

[app]
public_url = "https://demo.example.com"

[wallet]
rpc_url = "http://127.0.0.1:8545"

[manifest.account_association]
header = "h"
payload = "p"
signature = "s"

[manifest.frame]
name = "Interview app"
icon_path = "icon.png"
image_path = "image.png"
splash_image_path = "splash.png"
splash_background_color = "#ffffff"
webhook_path = "api/webhook"
subtitle = "connect and interview"
description = "connect and interview"
primary_category = "social"
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = Config::from_toml(TEST_CONFIG).unwrap();

        assert_eq!(config.wallet.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.wallet.status_timeout(), None);
        assert_eq!(config.auth.issuer, "https://auth.farcaster.xyz");
        assert_eq!(config.notifications.title, "Hello from Frames v2!");
        assert_eq!(config.manifest.frame.version, "1");
    }

    #[test]
    fn test_auth_domain_is_public_hostname() {
        let config = Config::from_toml(TEST_CONFIG).unwrap();
        assert_eq!(config.auth_domain().unwrap(), "demo.example.com");
    }

    #[test]
    fn test_links_keep_base_path() {
        let mut config = Config::from_toml(TEST_CONFIG).unwrap();
        config.app.public_url = Url::parse("https://host.example/demo").unwrap();

        assert_eq!(config.app.link("icon.png").unwrap().as_str(), "https://host.example/demo/icon.png");
        assert_eq!(config.app.link("/api/webhook").unwrap().as_str(), "https://host.example/demo/api/webhook");
        assert_eq!(config.app.home_url(), "https://host.example/demo");
    }

    #[test]
    fn test_links_on_root_url() {
        let config = Config::from_toml(TEST_CONFIG).unwrap();

        assert_eq!(config.app.link("icon.png").unwrap().as_str(), "https://demo.example.com/icon.png");
        assert_eq!(config.app.home_url(), "https://demo.example.com");
    }
}

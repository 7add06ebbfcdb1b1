use super::events::{EventSubscription, HostEvent};
use super::transport::{HostError, HostTransport};
use super::types::{
    AddMiniAppResult, ComposeCastOptions, ComposeCastResult, ImpactStyle, MiniAppContext,
    NotificationType, SendTokenOptions, SolanaSimulation, SwapTokenOptions,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// How many undelivered events a slow subscriber may fall behind by
const EVENT_CAPACITY: usize = 64;

/// Client for the host the mini-app is embedded in
///
/// Constructed once and handed by reference (usually inside an `Arc`) to the
/// panels that need it.
pub struct MiniAppHost {
    transport: Arc<dyn HostTransport>,
    events: broadcast::Sender<HostEvent>,
}

#[derive(Deserialize)]
struct QuickAuthToken {
    token: String,
}

#[derive(Serialize, Deserialize)]
struct SolanaSignature {
    signature: String,
}

impl MiniAppHost {
    pub fn new(transport: Arc<dyn HostTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { transport, events }
    }

    /// Typed call through the transport
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, HostError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)
            .map_err(|e| HostError::malformed(format!("{}: {}", method, e)))?;
        debug!("host call {}", method);

        let value = self.transport.call(method, params).await?;
        serde_json::from_value(value).map_err(|e| HostError::malformed(format!("{}: {}", method, e)))
    }

    /// Call whose answer carries no information
    async fn notify<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> Result<(), HostError> {
        let _: Value = self.call(method, params).await?;
        Ok(())
    }

    pub async fn context(&self) -> Result<MiniAppContext, HostError> {
        self.call("context", &json!({})).await
    }

    /// Hide the host's splash screen
    pub async fn ready(&self) -> Result<(), HostError> {
        info!("signalling ready to host");
        self.notify("actions.ready", &json!({})).await
    }

    pub async fn close(&self) -> Result<(), HostError> {
        self.notify("actions.close", &json!({})).await
    }

    pub async fn open_url(&self, url: &str) -> Result<(), HostError> {
        self.notify("actions.openUrl", &json!({ "url": url })).await
    }

    pub async fn view_profile(&self, fid: u64) -> Result<(), HostError> {
        self.notify("actions.viewProfile", &json!({ "fid": fid })).await
    }

    pub async fn open_mini_app(&self, url: &str) -> Result<(), HostError> {
        self.notify("actions.openMiniApp", &json!({ "url": url })).await
    }

    pub async fn compose_cast(&self, options: &ComposeCastOptions) -> Result<ComposeCastResult, HostError> {
        self.call("actions.composeCast", options).await
    }

    pub async fn add_mini_app(&self) -> Result<AddMiniAppResult, HostError> {
        self.call("actions.addMiniApp", &json!({})).await
    }

    /// Short-lived bearer token for this app's backend
    pub async fn quick_auth(&self) -> Result<String, HostError> {
        let token: QuickAuthToken = self.call("quickAuth.getToken", &json!({})).await?;
        Ok(token.token)
    }

    /// Ask the user's custody key to sign a domain manifest
    pub async fn sign_manifest(&self, domain: &str) -> Result<Value, HostError> {
        self.call("experimental.signManifest", &json!({ "domain": domain })).await
    }

    pub async fn swap_token(&self, options: &SwapTokenOptions) -> Result<Value, HostError> {
        self.call("actions.swapToken", options).await
    }

    pub async fn send_token(&self, options: &SendTokenOptions) -> Result<Value, HostError> {
        self.call("actions.sendToken", options).await
    }

    /// Names of the host capabilities (e.g. `haptics.impactOccurred`)
    pub async fn capabilities(&self) -> Result<Vec<String>, HostError> {
        self.call("getCapabilities", &json!({})).await
    }

    pub async fn impact_occurred(&self, style: ImpactStyle) -> Result<(), HostError> {
        self.notify("haptics.impactOccurred", &json!({ "type": style })).await
    }

    pub async fn notification_occurred(&self, kind: NotificationType) -> Result<(), HostError> {
        self.notify("haptics.notificationOccurred", &json!({ "type": kind })).await
    }

    pub async fn selection_changed(&self) -> Result<(), HostError> {
        self.notify("haptics.selectionChanged", &json!({})).await
    }

    /// Sign raw bytes with the host's Solana wallet
    pub async fn solana_sign_message(&self, message: &[u8]) -> Result<Vec<u8>, HostError> {
        let signed: SolanaSignature = self
            .call("solana.signMessage", &json!({ "message": BASE64.encode(message) }))
            .await?;
        BASE64
            .decode(signed.signature)
            .map_err(|e| HostError::malformed(format!("solana.signMessage: {}", e)))
    }

    pub async fn solana_simulate<T: Serialize + ?Sized>(&self, transaction: &T) -> Result<SolanaSimulation, HostError> {
        self.call("solana.simulateTransaction", transaction).await
    }

    /// Sign and submit; returns the base58 transaction signature
    pub async fn solana_sign_and_send<T: Serialize + ?Sized>(&self, transaction: &T) -> Result<String, HostError> {
        let sent: SolanaSignature = self.call("solana.signAndSendTransaction", transaction).await?;
        Ok(sent.signature)
    }

    /// Deliver an event pushed by the host to every live subscription
    ///
    /// Returns how many subscriptions received it.
    pub fn dispatch(&self, event: HostEvent) -> usize {
        debug!("host event {:?}", event);
        self.events.send(event).unwrap_or(0)
    }

    /// Start listening for host events
    ///
    /// The listener is released when the returned subscription is dropped.
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.events.subscribe())
    }
}

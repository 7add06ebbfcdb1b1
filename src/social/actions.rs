use super::backend::BackendClient;
use crate::action::{ActionSlot, ActionState};
use crate::host::{
    ComposeCastOptions, ComposeCastResult, HostErrorKind, HostEvent, HostSession, ImpactStyle, MiniAppContext,
    MiniAppHost, NotificationType,
};
use crate::render;
use crate::DemoError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const CAST_TEXT: &str = "Hello from Demo Mini App";
pub const CAST_EMBED: &str = "https://test.com/foo%20bar";

/// Channel choices for compose; `""` posts without a channel
pub const CHANNEL_OPTIONS: [&str; 5] = ["", "staging", "founders", "bounties", "gaming"];

/// Mini apps the "open mini app" action offers (embed, launcher, invalid)
pub const MINI_APP_URLS: [&str; 3] = [
    "https://www.bountycaster.xyz/bounty/0x392626b092e05955c11c41c5df8e2fb8003ece78",
    "https://farcaster.xyz/miniapps/Qqjy9efZ-1Qu/eggs",
    "https://swizec.com/",
];

pub const RICKROLL_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const COMPOSE_URL: &str = "https://warpcast.com/~/compose";
pub const DEFAULT_MANIFEST_DOMAIN: &str = "www.microsoft.com";

/// All three must be present for the haptics actions to be offered
pub const HAPTIC_CAPABILITIES: [&str; 3] = [
    "haptics.impactOccurred",
    "haptics.notificationOccurred",
    "haptics.selectionChanged",
];

const NO_URL_SELECTED: &str = "Please select a URL";
const NO_DOMAIN: &str = "Please enter a domain";
const INVALID_FID: &str = "Fid must be a positive integer";
const NO_HAPTICS: &str = "Your device does not support haptics.";
const NO_NOTIFICATION_DETAILS: &str = "No notification details";

pub struct SocialPanel {
    host: Arc<MiniAppHost>,
    backend: BackendClient,
    context: RwLock<Option<MiniAppContext>>,
    session: RwLock<HostSession>,
    haptics: RwLock<bool>,
    compose: ActionSlot<ComposeCastResult>,
    open_mini_app: ActionSlot<String>,
    add_mini_app: ActionSlot<String>,
    sign_manifest: ActionSlot<String>,
    send_notification: ActionSlot<String>,
}

impl SocialPanel {
    pub fn new(host: Arc<MiniAppHost>, backend: BackendClient) -> Self {
        Self {
            host,
            backend,
            context: RwLock::new(None),
            session: RwLock::new(HostSession::default()),
            haptics: RwLock::new(false),
            compose: ActionSlot::new("compose cast"),
            open_mini_app: ActionSlot::new("open mini app"),
            add_mini_app: ActionSlot::new("add mini app"),
            sign_manifest: ActionSlot::new("sign manifest"),
            send_notification: ActionSlot::new("send notification"),
        }
    }

    /// Read the host context, probe haptics and hide the splash screen
    pub async fn load(&self) -> Result<MiniAppContext, DemoError> {
        let context = self.host.context().await?;
        *self.session.write().await = HostSession::from_context(&context);
        *self.context.write().await = Some(context.clone());

        let capabilities = self.host.capabilities().await?;
        debug!("host capabilities: {:?}", capabilities);
        let haptics = HAPTIC_CAPABILITIES
            .iter()
            .all(|needed| capabilities.iter().any(|have| have == needed));
        *self.haptics.write().await = haptics;

        self.host.ready().await?;
        info!("loaded context for fid {}", context.user.fid);
        Ok(context)
    }

    /// Fold host events into the session until the host goes away
    pub async fn follow_events(&self) {
        let mut events = self.host.subscribe();
        while let Some(event) = events.next().await {
            self.apply_event(&event).await;
        }
    }

    pub async fn apply_event(&self, event: &HostEvent) {
        self.session.write().await.apply(event);
    }

    pub async fn session(&self) -> HostSession {
        self.session.read().await.clone()
    }

    pub async fn haptics_supported(&self) -> bool {
        *self.haptics.read().await
    }

    /// Open the cast composer, optionally in one of [`CHANNEL_OPTIONS`]
    pub async fn compose_cast(&self, channel: &str) -> ActionState<ComposeCastResult> {
        let options = ComposeCastOptions {
            text: CAST_TEXT.to_string(),
            embeds: vec![CAST_EMBED.to_string()],
            channel_key: (!channel.is_empty()).then(|| channel.to_string()),
        };
        self.compose
            .run(async { self.host.compose_cast(&options).await.map_err(DemoError::from) })
            .await
    }

    /// `fid` is the raw input; it must be an integer ≥ 1
    pub async fn view_profile(&self, fid: &str) -> Result<(), DemoError> {
        let fid = fid
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|fid| *fid >= 1)
            .ok_or(DemoError::MissingPrecondition(INVALID_FID))?;
        Ok(self.host.view_profile(fid).await?)
    }

    pub async fn open_url(&self, url: &str) -> Result<(), DemoError> {
        Ok(self.host.open_url(url).await?)
    }

    pub async fn close(&self) -> Result<(), DemoError> {
        Ok(self.host.close().await?)
    }

    pub async fn open_mini_app(&self, url: Option<&str>) -> ActionState<String> {
        self.open_mini_app
            .run(async {
                let url = url
                    .filter(|url| !url.is_empty())
                    .ok_or(DemoError::MissingPrecondition(NO_URL_SELECTED))?;
                self.host.open_mini_app(url).await?;
                Ok("Mini app opened successfully".to_string())
            })
            .await
    }

    /// Ask the host to add this app; success carries the result line
    ///
    /// Clears the stored notification details first. A rejection or an
    /// invalid domain manifest reads `Not added: ...`, anything else
    /// `Error: ...`.
    pub async fn add_mini_app(&self) -> ActionState<String> {
        self.add_mini_app
            .run(async {
                self.session.write().await.notification_details = None;

                let line = match self.host.add_mini_app().await {
                    Ok(result) => match result.notification_details {
                        Some(details) => {
                            let line = format!(
                                "Added, got notification token {} and url {}",
                                details.token, details.url
                            );
                            self.session.write().await.notification_details = Some(details);
                            line
                        }
                        None => "Added, got no notification details".to_string(),
                    },
                    Err(e) if matches!(e.kind, HostErrorKind::RejectedByUser | HostErrorKind::InvalidDomainManifest) => {
                        format!("Not added: {}", e.message)
                    }
                    Err(e) => format!("Error: {}", e),
                };
                Ok(line)
            })
            .await
    }

    /// Have the user's custody key sign a manifest for `domain`
    pub async fn sign_manifest(&self, domain: &str) -> ActionState<String> {
        self.sign_manifest
            .run(async {
                if domain.trim().is_empty() {
                    return Err(DemoError::MissingPrecondition(NO_DOMAIN));
                }
                let manifest = self.host.sign_manifest(domain.trim()).await?;
                render::safe_json(&manifest)
            })
            .await
    }

    async fn require_haptics(&self) -> Result<(), DemoError> {
        if self.haptics_supported().await {
            Ok(())
        } else {
            Err(DemoError::MissingPrecondition(NO_HAPTICS))
        }
    }

    pub async fn impact(&self, style: ImpactStyle) -> Result<(), DemoError> {
        self.require_haptics().await?;
        Ok(self.host.impact_occurred(style).await?)
    }

    pub async fn notification_feedback(&self, kind: NotificationType) -> Result<(), DemoError> {
        self.require_haptics().await?;
        Ok(self.host.notification_occurred(kind).await?)
    }

    pub async fn selection_changed(&self) -> Result<(), DemoError> {
        self.require_haptics().await?;
        Ok(self.host.selection_changed().await?)
    }

    /// Ask the backend to send a test notification to this user
    pub async fn send_notification(&self) -> ActionState<String> {
        self.send_notification
            .run(async {
                let fid = self
                    .context
                    .read()
                    .await
                    .as_ref()
                    .map(|context| context.user.fid);
                let details = self.session.read().await.notification_details.clone();

                match (fid, details) {
                    (Some(fid), Some(details)) => self.backend.send_notification(fid, &details).await,
                    _ => Err(DemoError::MissingPrecondition(NO_NOTIFICATION_DETAILS)),
                }
            })
            .await
    }
}

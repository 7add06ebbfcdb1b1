use super::plan::{SolanaPubkey, TransactionPlan};
use super::tokens::{SplToken, to_base_units};
use crate::action::{ActionSlot, ActionState};
use crate::ethereum::DEMO_MESSAGE;
use crate::host::MiniAppHost;
use crate::render;
use crate::DemoError;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Receives the 1-lamport demo transfer
pub const SOL_RECIPIENT: &str = "Ao3gLNZAsbrmnusWVqQCPMrcqNi6jdYgu8T6NCoXXQu1";

const NO_PUBLIC_KEY: &str = "no Solana publicKey";
const NO_TOKEN_TO_SEND: &str = "Please select a token to send.";
const NO_TOKEN_TO_APPROVE: &str = "Please select a token to approve.";
const NO_DESTINATION: &str = "Please enter a destination address.";

/// Amount moved by the token send action
const TOKEN_SEND_AMOUNT: &str = "0.1";
/// Allowance granted by the token approve action
const TOKEN_APPROVE_AMOUNT: &str = "1000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    Send,
    Approve,
}

/// Inputs of the token send / approve form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenForm {
    pub token: Option<SplToken>,
    /// Recipient (send) or delegate (approve), base58
    pub destination: String,
    pub versioned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTxOutcome {
    pub signature: String,
    pub action: TokenAction,
}

pub struct SolanaPanel {
    host: Arc<MiniAppHost>,
    public_key: RwLock<Option<SolanaPubkey>>,
    sign_message: ActionSlot<String>,
    send_sol: ActionSlot<String>,
    token_tx: ActionSlot<TokenTxOutcome>,
    last_simulation: RwLock<Option<String>>,
}

impl SolanaPanel {
    pub fn new(host: Arc<MiniAppHost>, public_key: Option<SolanaPubkey>) -> Self {
        Self {
            host,
            public_key: RwLock::new(public_key),
            sign_message: ActionSlot::new("solana sign message"),
            send_sol: ActionSlot::new("solana send"),
            token_tx: ActionSlot::new("solana token transaction"),
            last_simulation: RwLock::new(None),
        }
    }

    pub async fn set_public_key(&self, public_key: Option<SolanaPubkey>) {
        *self.public_key.write().await = public_key;
    }

    /// Form prefilled the way the panel opens: no token, own address as
    /// destination
    pub async fn default_form(&self) -> TokenForm {
        TokenForm {
            destination: self
                .public_key
                .read()
                .await
                .map(|key| key.to_string())
                .unwrap_or_default(),
            ..TokenForm::default()
        }
    }

    async fn require_public_key(&self) -> Result<SolanaPubkey, DemoError> {
        self.public_key
            .read()
            .await
            .ok_or(DemoError::MissingPrecondition(NO_PUBLIC_KEY))
    }

    /// Sign [`DEMO_MESSAGE`]; success carries the base64 signature
    pub async fn sign_message(&self) -> ActionState<String> {
        self.sign_message
            .run(async {
                self.require_public_key().await?;
                let signature = self.host.solana_sign_message(DEMO_MESSAGE.as_bytes()).await?;
                Ok(BASE64.encode(signature))
            })
            .await
    }

    /// Simulate, then sign and send 1 lamport to [`SOL_RECIPIENT`]
    pub async fn send_sol(&self) -> ActionState<String> {
        self.send_sol
            .run(async {
                let from = self.require_public_key().await?;
                let to: SolanaPubkey = SOL_RECIPIENT.parse()?;
                let plan = TransactionPlan::transfer_lamports(from, to, 1);

                let simulation = self.host.solana_simulate(&plan).await?;
                if let Some(err) = simulation.err {
                    warn!("lamport transfer simulation failed: {}", err);
                    return Err(DemoError::failed("Simulation failed"));
                }

                let signature = self.host.solana_sign_and_send(&plan).await?;
                info!("lamport transfer sent: {}", signature);
                Ok(signature)
            })
            .await
    }

    /// Send 0.1 of the selected token to the form's destination
    ///
    /// The simulation result is kept for display; a failing simulation
    /// does not stop the send.
    pub async fn send_token(&self, form: &TokenForm) -> ActionState<TokenTxOutcome> {
        self.token_tx
            .run(async {
                let owner = self.require_public_key().await?;
                let (token, recipient) = validate_form(form, NO_TOKEN_TO_SEND)?;
                let mint: SolanaPubkey = token.mint().parse()?;
                let amount = to_base_units(TOKEN_SEND_AMOUNT, token.decimals())?;

                let plan = TransactionPlan::transfer_token(
                    owner,
                    recipient,
                    mint,
                    amount,
                    token.decimals(),
                    form.versioned,
                );

                let simulation = self.host.solana_simulate(&plan).await?;
                *self.last_simulation.write().await = Some(render::safe_json(&simulation)?);

                let signature = self.host.solana_sign_and_send(&plan).await?;
                info!("sent {} {} to {}: {}", TOKEN_SEND_AMOUNT, token, recipient, signature);
                Ok(TokenTxOutcome {
                    signature,
                    action: TokenAction::Send,
                })
            })
            .await
    }

    /// Let the form's destination spend 1000 of the selected token
    pub async fn approve_token(&self, form: &TokenForm) -> ActionState<TokenTxOutcome> {
        self.token_tx
            .run(async {
                let owner = self.require_public_key().await?;
                let (token, delegate) = validate_form(form, NO_TOKEN_TO_APPROVE)?;
                let mint: SolanaPubkey = token.mint().parse()?;
                let amount = to_base_units(TOKEN_APPROVE_AMOUNT, token.decimals())?;

                let plan = TransactionPlan::approve_token(owner, delegate, mint, amount, form.versioned);
                let signature = self.host.solana_sign_and_send(&plan).await?;
                info!("approved {} {} for {}: {}", TOKEN_APPROVE_AMOUNT, token, delegate, signature);
                Ok(TokenTxOutcome {
                    signature,
                    action: TokenAction::Approve,
                })
            })
            .await
    }

    /// JSON of the last token-send simulation
    pub async fn last_simulation(&self) -> Option<String> {
        self.last_simulation.read().await.clone()
    }

    pub fn token_tx_slot(&self) -> &ActionSlot<TokenTxOutcome> {
        &self.token_tx
    }
}

fn validate_form(form: &TokenForm, no_token: &'static str) -> Result<(SplToken, SolanaPubkey), DemoError> {
    let token = form.token.ok_or(DemoError::MissingPrecondition(no_token))?;
    if form.destination.trim().is_empty() {
        return Err(DemoError::MissingPrecondition(NO_DESTINATION));
    }
    Ok((token, form.destination.parse()?))
}

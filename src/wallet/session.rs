use super::{DemoChain, WalletClient};
use crate::DemoError;
use ethers::providers::JsonRpcClient;
use ethers::types::Address;
use tokio::sync::RwLock;
use tracing::info;

/// Precondition text shown when an action needs a connected account
pub const NO_WALLET_ACCOUNT: &str = "No wallet client or address";

/// Wallet client plus what is currently connected
///
/// Shared (behind an `Arc`) by every panel that talks to the EVM wallet.
pub struct WalletSession<P> {
    client: WalletClient<P>,
    account: RwLock<Option<Address>>,
    chain_id: RwLock<Option<u64>>,
}

impl<P: JsonRpcClient> WalletSession<P> {
    pub fn new(client: WalletClient<P>) -> Self {
        Self {
            client,
            account: RwLock::new(None),
            chain_id: RwLock::new(None),
        }
    }

    /// Session for a wallet that is already connected (e.g. the host's
    /// built-in wallet)
    pub fn connected(client: WalletClient<P>, account: Address, chain_id: u64) -> Self {
        Self {
            client,
            account: RwLock::new(Some(account)),
            chain_id: RwLock::new(Some(chain_id)),
        }
    }

    pub fn client(&self) -> &WalletClient<P> {
        &self.client
    }

    pub async fn account(&self) -> Option<Address> {
        *self.account.read().await
    }

    pub async fn chain_id(&self) -> Option<u64> {
        *self.chain_id.read().await
    }

    pub async fn is_connected(&self) -> bool {
        self.account.read().await.is_some()
    }

    /// Connected account, or a precondition error without touching the
    /// network
    pub async fn require_account(&self) -> Result<Address, DemoError> {
        self.account()
            .await
            .ok_or(DemoError::MissingPrecondition(NO_WALLET_ACCOUNT))
    }

    /// Prompt the wallet for its accounts and remember the first one
    pub async fn connect(&self) -> Result<Address, DemoError> {
        let accounts = self.client.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| DemoError::failed("Wallet returned no accounts"))?;
        let chain_id = self.client.chain_id().await?;

        *self.account.write().await = Some(account);
        *self.chain_id.write().await = Some(chain_id);
        info!("Connected {:?} on chain {}", account, chain_id);
        Ok(account)
    }

    pub async fn disconnect(&self) {
        *self.account.write().await = None;
        *self.chain_id.write().await = None;
        info!("Wallet disconnected");
    }

    pub async fn switch_chain(&self, chain: DemoChain) -> Result<(), DemoError> {
        self.client.switch_chain(chain).await?;
        *self.chain_id.write().await = Some(chain.id());
        Ok(())
    }
}

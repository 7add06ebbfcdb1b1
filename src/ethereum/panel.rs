use crate::action::{ActionSlot, ActionState};
use crate::wallet::{DemoChain, WalletSession};
use crate::DemoError;
use ethers::providers::JsonRpcClient;
use ethers::types::{Address, Bytes, H160, H256, TransactionRequest, U256};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Text signed by the sign-message actions
pub const DEMO_MESSAGE: &str = "Hello from Frames v2!";

/// Protocol Guild donation address on Base
const PROTOCOL_GUILD_BASE: Address = H160([
    0x32, 0xe3, 0xc7, 0xfd, 0x24, 0xe1, 0x75, 0x70, 0x1a, 0x35, 0xc2, 0x24, 0xf2, 0x23, 0x8d, 0x18, 0x43, 0x9c,
    0x7d, 0xbc,
]);

/// Protocol Guild donation address elsewhere
const PROTOCOL_GUILD: Address = H160([
    0xb3, 0xd8, 0xd7, 0x88, 0x76, 0x93, 0xa9, 0x85, 0x27, 0x34, 0xb4, 0xd2, 0x5e, 0x9c, 0x0b, 0xb3, 0x5b, 0xa8,
    0xa8, 0x30,
]);

/// Yoink contract on Monad testnet
const YOINK: Address = H160([
    0x4b, 0xbf, 0xd1, 0x20, 0xd9, 0xf3, 0x52, 0xa0, 0xbe, 0xd7, 0xa0, 0x14, 0xbd, 0x67, 0x91, 0x3a, 0x20, 0x07,
    0xa8, 0x78,
]);

/// `yoink()` calldata
const YOINK_CALLDATA: [u8; 9] = [0x98, 0x46, 0xcd, 0x9e, 0xfc, 0x00, 0x00, 0x23, 0xc0];

/// Confirmation progress of a sent transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirming,
    Confirmed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxStatus::Pending => "Pending",
            TxStatus::Confirming => "Confirming...",
            TxStatus::Confirmed => "Confirmed!",
        })
    }
}

/// EIP-712 document signed by the typed-data action
pub fn typed_data_message(chain_id: u64) -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" }
            ],
            "Message": [{ "name": "content", "type": "string" }]
        },
        "primaryType": "Message",
        "domain": { "name": "Frames v2 Demo", "version": "1", "chainId": chain_id },
        "message": { "content": DEMO_MESSAGE }
    })
}

pub struct EthereumPanel<P> {
    session: Arc<WalletSession<P>>,
    connect: ActionSlot<Address>,
    sign_message: ActionSlot<Bytes>,
    sign_typed: ActionSlot<Bytes>,
    send_eth: ActionSlot<H256>,
    send_contract: ActionSlot<H256>,
    switch_chain: ActionSlot<DemoChain>,
}

impl<P: JsonRpcClient> EthereumPanel<P> {
    pub fn new(session: Arc<WalletSession<P>>) -> Self {
        Self {
            session,
            connect: ActionSlot::new("connect"),
            sign_message: ActionSlot::new("sign message"),
            sign_typed: ActionSlot::new("sign typed data"),
            send_eth: ActionSlot::new("send eth"),
            send_contract: ActionSlot::new("send contract transaction"),
            switch_chain: ActionSlot::new("switch chain"),
        }
    }

    pub fn session(&self) -> &WalletSession<P> {
        &self.session
    }

    /// Connect when disconnected, disconnect when connected
    pub async fn toggle_connection(&self) -> ActionState<Address> {
        if self.session.is_connected().await {
            self.session.disconnect().await;
            return ActionState::Idle;
        }
        self.connect.run(self.session.connect()).await
    }

    /// Sign [`DEMO_MESSAGE`], connecting first if needed
    pub async fn sign_message(&self) -> ActionState<Bytes> {
        self.sign_message
            .run(async {
                let account = match self.session.account().await {
                    Some(account) => account,
                    None => self.session.connect().await?,
                };
                self.session.client().sign_message(account, DEMO_MESSAGE).await
            })
            .await
    }

    pub async fn sign_typed_data(&self) -> ActionState<Bytes> {
        self.sign_typed
            .run(async {
                let account = self.session.require_account().await?;
                let chain_id = self.session.chain_id().await.unwrap_or(DemoChain::Base.id());
                self.session
                    .client()
                    .sign_typed_data(account, &typed_data_message(chain_id))
                    .await
            })
            .await
    }

    /// Send 1 wei to Protocol Guild
    pub async fn send_eth(&self) -> ActionState<H256> {
        self.send_eth
            .run(async {
                let account = self.session.require_account().await?;
                let to = if self.session.chain_id().await == Some(DemoChain::Base.id()) {
                    PROTOCOL_GUILD_BASE
                } else {
                    PROTOCOL_GUILD
                };
                let tx = TransactionRequest::new().from(account).to(to).value(U256::one());
                self.session.client().send_transaction(&tx).await
            })
            .await
    }

    /// Call `yoink()` on Monad testnet
    pub async fn send_contract_transaction(&self) -> ActionState<H256> {
        self.send_contract
            .run(async {
                let account = self.session.require_account().await?;
                let tx = TransactionRequest::new()
                    .from(account)
                    .to(YOINK)
                    .data(Bytes::from(YOINK_CALLDATA.to_vec()))
                    .chain_id(DemoChain::MonadTestnet.id());
                self.session.client().send_transaction(&tx).await
            })
            .await
    }

    /// Move the wallet to the next chain in the demo cycle
    pub async fn switch_to_next_chain(&self) -> ActionState<DemoChain> {
        self.switch_chain
            .run(async {
                let next = DemoChain::next_after(self.session.chain_id().await);
                self.session.switch_chain(next).await?;
                info!("Now on {}", next);
                Ok(next)
            })
            .await
    }

    /// Where a sent transaction is
    ///
    /// `Pending` until the wallet has returned a hash, `Confirming...` while
    /// no receipt exists yet, `Confirmed!` once a successful receipt is found.
    pub async fn transaction_status(&self, hash: Option<H256>) -> Result<TxStatus, DemoError> {
        let Some(hash) = hash else {
            return Ok(TxStatus::Pending);
        };
        match self.session.client().transaction_receipt(hash).await? {
            None => Ok(TxStatus::Confirming),
            Some(receipt) if receipt.status.is_some_and(|status| status.is_zero()) => {
                Err(DemoError::failed(format!("Transaction {:?} reverted", hash)))
            }
            Some(_) => Ok(TxStatus::Confirmed),
        }
    }

    pub fn connect_slot(&self) -> &ActionSlot<Address> {
        &self.connect
    }

    pub fn sign_message_slot(&self) -> &ActionSlot<Bytes> {
        &self.sign_message
    }

    pub fn send_eth_slot(&self) -> &ActionSlot<H256> {
        &self.send_eth
    }
}

//! Wallet Client Module
//!
//! Thin typed layer over the wallet's JSON-RPC interface. Nothing here signs
//! or builds transactions itself: every method forwards to the wallet and
//! decodes its answer.

use super::DemoChain;
use crate::{BatchHandle, BatchRequest, BatchStatus, CallDescriptor, CallsStatus, Capabilities, DemoError};
use crate::types::SendCallsResult;
use ethers::providers::{JsonRpcClient, Provider};
use ethers::types::{Address, Bytes, H256, TransactionReceipt, TransactionRequest, U64};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// EIP-5792 request format version sent with `wallet_sendCalls`
const SEND_CALLS_VERSION: &str = "2.0.0";

const NO_PARAMS: [(); 0] = [];

/// `wallet_sendCalls` parameter object
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCallsParams<'a> {
    version: &'static str,
    chain_id: U64,
    from: Address,
    atomic_required: bool,
    calls: &'a [CallDescriptor],
    capabilities: serde_json::Map<String, Value>,
}

/// Typed wallet RPC client
pub struct WalletClient<P> {
    provider: Provider<P>,
}

impl<P: JsonRpcClient> WalletClient<P> {
    pub fn new(provider: Provider<P>) -> Self {
        Self { provider }
    }

    /// Ask the wallet to expose its accounts (the "connect" prompt)
    pub async fn request_accounts(&self) -> Result<Vec<Address>, DemoError> {
        Ok(self.provider.request("eth_requestAccounts", NO_PARAMS).await?)
    }

    pub async fn chain_id(&self) -> Result<u64, DemoError> {
        let id: U64 = self.provider.request("eth_chainId", NO_PARAMS).await?;
        Ok(id.as_u64())
    }

    pub async fn switch_chain(&self, chain: DemoChain) -> Result<(), DemoError> {
        info!("Switching wallet to {} ({})", chain, chain.id());
        let _: Value = self
            .provider
            .request(
                "wallet_switchEthereumChain",
                [json!({ "chainId": format!("{:#x}", chain.id()) })],
            )
            .await?;
        Ok(())
    }

    /// Batching features the wallet exposes for `account`
    ///
    /// `None` when the wallet answers without a capability map.
    pub async fn get_capabilities(&self, account: Address) -> Result<Option<Capabilities>, DemoError> {
        Ok(self.provider.request("wallet_getCapabilities", [account]).await?)
    }

    /// Submit a batch of calls
    ///
    /// Calls are forwarded in exactly the order given. `request.atomic` maps
    /// to `atomicRequired`; ordering and inclusion beyond that are up to the
    /// wallet and chain.
    pub async fn send_calls(
        &self,
        account: Address,
        chain: DemoChain,
        request: &BatchRequest,
    ) -> Result<BatchHandle, DemoError> {
        let params = SendCallsParams {
            version: SEND_CALLS_VERSION,
            chain_id: U64::from(chain.id()),
            from: account,
            atomic_required: request.atomic,
            calls: &request.calls,
            capabilities: serde_json::Map::new(),
        };
        info!(
            "Submitting {} calls on {} (atomic: {})",
            request.calls.len(),
            chain,
            request.atomic
        );

        let result: SendCallsResult = self.provider.request("wallet_sendCalls", [params]).await?;
        Ok(result.into_handle())
    }

    /// One status snapshot for `handle`
    pub async fn get_calls_status(&self, handle: &BatchHandle) -> Result<BatchStatus, DemoError> {
        let payload: CallsStatus = self.provider.request("wallet_getCallsStatus", [handle]).await?;
        Ok(BatchStatus::from_payload(handle.clone(), payload))
    }

    /// Poll `handle` every `interval` until the wallet reports a terminal
    /// status
    ///
    /// With `timeout = None` the wait is unbounded; a batch the wallet never
    /// resolves keeps the caller waiting.
    pub async fn wait_for_calls_status(
        &self,
        handle: &BatchHandle,
        interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<BatchStatus, DemoError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_until_terminal(handle, interval))
                .await
                .map_err(|_| DemoError::failed(format!("Timed out waiting for batch {}", handle)))?,
            None => self.poll_until_terminal(handle, interval).await,
        }
    }

    async fn poll_until_terminal(&self, handle: &BatchHandle, interval: Duration) -> Result<BatchStatus, DemoError> {
        loop {
            let status = self.get_calls_status(handle).await?;
            if status.is_terminal() {
                info!("Batch {} finished: {:?}", handle, status.state);
                return Ok(status);
            }
            debug!("Batch {} still pending", handle);
            sleep(interval).await;
        }
    }

    /// `personal_sign` over the UTF-8 bytes of `message`
    pub async fn sign_message(&self, account: Address, message: &str) -> Result<Bytes, DemoError> {
        let message = Bytes::from(message.as_bytes().to_vec());
        Ok(self.provider.request("personal_sign", (message, account)).await?)
    }

    /// `eth_signTypedData_v4` over a complete EIP-712 document
    pub async fn sign_typed_data(&self, account: Address, typed_data: &Value) -> Result<Bytes, DemoError> {
        Ok(self
            .provider
            .request("eth_signTypedData_v4", (account, typed_data.to_string()))
            .await?)
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<H256, DemoError> {
        Ok(self.provider.request("eth_sendTransaction", [tx]).await?)
    }

    pub async fn transaction_receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>, DemoError> {
        Ok(self.provider.request("eth_getTransactionReceipt", [hash]).await?)
    }
}

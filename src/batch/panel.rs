//! Batch Panel
//!
//! The "wallet.getCapabilities / wallet.sendCalls" demo: one capability
//! probe and two batch submissions, each with its own action slot.

use super::builder::{approve_and_transfer_calls, demo_transfer_calls};
use crate::action::{ActionSlot, ActionState};
use crate::wallet::{DemoChain, WalletSession};
use crate::{BatchHandle, BatchRequest, DemoError, render};
use ethers::providers::JsonRpcClient;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct BatchPanel<P> {
    session: Arc<WalletSession<P>>,
    /// Chain every batch is submitted on
    chain: DemoChain,
    poll_interval: Duration,
    status_timeout: Option<Duration>,
    /// User toggle applied to the transfer batch only
    force_atomic: AtomicBool,
    capabilities: ActionSlot<String>,
    batch_calls: ActionSlot<String>,
    approve_transfer: ActionSlot<String>,
    batch_calls_handle: RwLock<Option<BatchHandle>>,
    approve_transfer_handle: RwLock<Option<BatchHandle>>,
}

impl<P: JsonRpcClient> BatchPanel<P> {
    pub fn new(session: Arc<WalletSession<P>>, poll_interval: Duration) -> Self {
        Self {
            session,
            chain: DemoChain::Base,
            poll_interval,
            status_timeout: None,
            force_atomic: AtomicBool::new(false),
            capabilities: ActionSlot::new("get capabilities"),
            batch_calls: ActionSlot::new("send batch calls"),
            approve_transfer: ActionSlot::new("approve and transfer"),
            batch_calls_handle: RwLock::new(None),
            approve_transfer_handle: RwLock::new(None),
        }
    }

    /// Bound the status wait (unbounded by default)
    pub fn with_status_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn force_atomic(&self) -> bool {
        self.force_atomic.load(Ordering::Relaxed)
    }

    pub fn set_force_atomic(&self, force_atomic: bool) {
        self.force_atomic.store(force_atomic, Ordering::Relaxed);
    }

    pub fn capabilities_slot(&self) -> &ActionSlot<String> {
        &self.capabilities
    }

    pub fn batch_calls_slot(&self) -> &ActionSlot<String> {
        &self.batch_calls
    }

    pub fn approve_transfer_slot(&self) -> &ActionSlot<String> {
        &self.approve_transfer
    }

    /// Handle of the latest transfer batch, available while it is polled
    pub async fn batch_calls_handle(&self) -> Option<BatchHandle> {
        self.batch_calls_handle.read().await.clone()
    }

    pub async fn approve_transfer_handle(&self) -> Option<BatchHandle> {
        self.approve_transfer_handle.read().await.clone()
    }

    /// Transfer batch as it would be submitted right now
    pub fn batch_request(&self) -> BatchRequest {
        BatchRequest::new(demo_transfer_calls(), self.force_atomic())
    }

    /// Approve + transfer batch; never atomic
    pub fn approve_transfer_request(&self) -> BatchRequest {
        BatchRequest::new(approve_and_transfer_calls(), false)
    }

    /// Probe the wallet's batching capabilities and render them
    pub async fn get_capabilities(&self) -> ActionState<String> {
        self.capabilities
            .run(async {
                let account = self.session.require_account().await?;
                match self.session.client().get_capabilities(account).await? {
                    Some(capabilities) => render::safe_json(&capabilities),
                    None => Err(DemoError::failed("No capabilities found")),
                }
            })
            .await
    }

    pub async fn send_batch_calls(&self) -> ActionState<String> {
        let request = self.batch_request();
        self.batch_calls
            .run(self.submit_and_wait(request, &self.batch_calls_handle))
            .await
    }

    pub async fn send_approve_and_transfer(&self) -> ActionState<String> {
        let request = self.approve_transfer_request();
        self.approve_transfer
            .run(self.submit_and_wait(request, &self.approve_transfer_handle))
            .await
    }

    async fn submit_and_wait(
        &self,
        request: BatchRequest,
        handle_slot: &RwLock<Option<BatchHandle>>,
    ) -> Result<String, DemoError> {
        let account = self.session.require_account().await?;
        *handle_slot.write().await = None;

        if let Err(err) = self.session.switch_chain(self.chain).await {
            warn!("Could not switch wallet to {}: {}", self.chain, err);
        }

        let client = self.session.client();
        let handle = client.send_calls(account, self.chain, &request).await?;
        info!("Batch submitted with id {}", handle);
        *handle_slot.write().await = Some(handle.clone());

        let status = client
            .wait_for_calls_status(&handle, self.poll_interval, self.status_timeout)
            .await?;
        render::batch_status(&status)
    }
}

//! Batched-Call Module
//!
//! Submits groups of calls through `wallet_sendCalls` and waits for their
//! outcome.
//!
//! # Flow
//! 1. Probe the wallet's batching capabilities (optional, independent)
//! 2. Build a fixed demo call list
//! 3. Switch the wallet to Base and submit the batch
//! 4. Record the returned handle
//! 5. Poll until the wallet reports a terminal status and render it

pub mod builder;
mod panel;


pub use builder::{approve_and_transfer_calls, demo_transfer_calls};
pub use panel::BatchPanel;

//! Wallet Module
//!
//! EIP-1193 wallet access over an `ethers` JSON-RPC provider.
//!
//! # Components
//! - **WalletClient**: typed wallet RPC calls, including the EIP-5792
//!   batch-call methods and the status polling helper
//! - **WalletSession**: the client plus the connected account and chain
//! - **DemoChain**: the chains the demo switches between

mod chains;
mod client;
mod session;

#[cfg(test)]
mod tests;

pub use chains::DemoChain;
pub use client::WalletClient;
pub use session::{NO_WALLET_ACCOUNT, WalletSession};

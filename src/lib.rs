//! This crate implements a demonstration mini-app for a social client: a
//! client-side library of wallet, host and Solana actions plus the small HTTP
//! backend the mini-app talks to.
//! It includes modules for shared types, error handling, per-action state,
//! EVM wallet access, batched calls, the host bridge, the action panels,
//! the API server, and configuration.

pub mod types; // Batch call data model shared by the wallet and batch modules.
pub mod error; // Client-side action errors and user-rejection detection.
pub mod render; // Decimal-safe rendering of results for display.
pub mod action; // Generic per-action async state with a re-entrancy guard.
pub mod wallet; // EVM wallet JSON-RPC client and connected session.
pub mod batch; // EIP-5792 batched calls: builders, submission and polling.
pub mod ethereum; // Single-transaction wallet actions.
pub mod host; // Explicit client for the host the mini-app runs in.
pub mod social; // Host actions, quick-auth sign-in, notifications and swaps.
pub mod solana; // Solana signing and SPL token transfers via the host wallet.
pub mod api; // HTTP backend: /api/me, send-notification and discovery document.
pub mod config; // Defines and loads application configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use error::DemoError;
pub use config::Config;

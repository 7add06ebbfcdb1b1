//! Solana Panel Module
//!
//! Message signing, a 1-lamport transfer and SPL token send / approve through
//! the host's Solana wallet.
//!
//! Transactions are described as [`TransactionPlan`]s: ordered instructions
//! plus the fee payer. The host wallet resolves the recent blockhash and the
//! associated token accounts, compiles the plan (legacy or v0) and signs it.
//!
//! # Components
//! - **SolanaPubkey**: base58 ed25519 public key
//! - **SplToken**: the selectable tokens and their decimals
//! - **TransactionPlan / PlanInstruction**: what the host is asked to build
//! - **SolanaPanel**: the panel's actions

mod panel;
mod plan;
mod tokens;


pub use panel::{SOL_RECIPIENT, SolanaPanel, TokenAction, TokenForm, TokenTxOutcome};
pub use plan::{PlanInstruction, SolanaPubkey, TransactionPlan};
pub use tokens::{SplToken, to_base_units};

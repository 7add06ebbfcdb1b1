use crate::render::decimal;
use crate::DemoError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// ed25519 public key, written as base58
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolanaPubkey([u8; 32]);

impl SolanaPubkey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for SolanaPubkey {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DemoError::failed(format!("Invalid Solana address {}", s));

        let bytes = bs58::decode(s.trim()).into_vec().map_err(|_| invalid())?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for SolanaPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl Serialize for SolanaPubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One instruction of a [`TransactionPlan`]
///
/// Token accounts are named by (owner, mint); the host derives the
/// associated token account addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlanInstruction {
    #[serde(rename_all = "camelCase")]
    SystemTransfer {
        from: SolanaPubkey,
        to: SolanaPubkey,
        #[serde(serialize_with = "decimal::serialize")]
        lamports: u64,
    },
    /// No-op when the account already exists
    #[serde(rename_all = "camelCase")]
    CreateAssociatedTokenAccountIdempotent {
        payer: SolanaPubkey,
        owner: SolanaPubkey,
        mint: SolanaPubkey,
    },
    #[serde(rename_all = "camelCase")]
    TransferChecked {
        mint: SolanaPubkey,
        source_owner: SolanaPubkey,
        destination_owner: SolanaPubkey,
        #[serde(serialize_with = "decimal::serialize")]
        amount: u64,
        decimals: u8,
    },
    #[serde(rename_all = "camelCase")]
    Approve {
        mint: SolanaPubkey,
        owner: SolanaPubkey,
        delegate: SolanaPubkey,
        #[serde(serialize_with = "decimal::serialize")]
        amount: u64,
    },
}

/// Transaction handed to the host wallet for simulation or signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPlan {
    pub fee_payer: SolanaPubkey,
    /// Compile as a v0 message instead of a legacy transaction
    pub versioned: bool,
    pub instructions: Vec<PlanInstruction>,
}

impl TransactionPlan {
    pub fn new(fee_payer: SolanaPubkey, versioned: bool) -> Self {
        Self {
            fee_payer,
            versioned,
            instructions: Vec::new(),
        }
    }

    pub fn with(mut self, instruction: PlanInstruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// 1-instruction lamport transfer
    pub fn transfer_lamports(from: SolanaPubkey, to: SolanaPubkey, lamports: u64) -> Self {
        Self::new(from, false).with(PlanInstruction::SystemTransfer { from, to, lamports })
    }

    /// Token transfer, creating the recipient's token account if missing
    pub fn transfer_token(
        owner: SolanaPubkey,
        recipient: SolanaPubkey,
        mint: SolanaPubkey,
        amount: u64,
        decimals: u8,
        versioned: bool,
    ) -> Self {
        Self::new(owner, versioned)
            .with(PlanInstruction::CreateAssociatedTokenAccountIdempotent {
                payer: owner,
                owner: recipient,
                mint,
            })
            .with(PlanInstruction::TransferChecked {
                mint,
                source_owner: owner,
                destination_owner: recipient,
                amount,
                decimals,
            })
    }

    pub fn approve_token(
        owner: SolanaPubkey,
        delegate: SolanaPubkey,
        mint: SolanaPubkey,
        amount: u64,
        versioned: bool,
    ) -> Self {
        Self::new(owner, versioned).with(PlanInstruction::Approve {
            mint,
            owner,
            delegate,
            amount,
        })
    }
}

//! Result Rendering Module
//!
//! Turns terminal results into display strings. Amounts are always written
//! as decimal strings so values past 2^53 keep every digit in the output.

use crate::{BatchState, BatchStatus, CallReceipt, DemoError};
use ethers::types::{H256, U256};
use serde::Serialize;
use serde_json::Value;

/// Serde helpers writing integers as decimal strings
///
/// Use with `#[serde(serialize_with = "render::decimal::serialize")]`.
pub mod decimal {
    use serde::Serializer;
    use std::fmt::Display;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

/// Pretty JSON of any serializable result
pub fn safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DemoError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DemoError::failed(format!("failed to render result: {}", e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStatusView<'a> {
    id: &'a str,
    status: BatchState,
    status_code: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    atomic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain_id: Option<String>,
    receipts: Vec<ReceiptView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptView<'a> {
    transaction_hash: &'a H256,
    block_hash: &'a H256,
    #[serde(serialize_with = "decimal::serialize")]
    block_number: &'a U256,
    #[serde(serialize_with = "decimal::serialize")]
    gas_used: &'a U256,
    status: &'static str,
    logs: usize,
}

impl<'a> From<&'a CallReceipt> for ReceiptView<'a> {
    fn from(receipt: &'a CallReceipt) -> Self {
        Self {
            transaction_hash: &receipt.transaction_hash,
            block_hash: &receipt.block_hash,
            block_number: &receipt.block_number,
            gas_used: &receipt.gas_used,
            status: if receipt.status.is_zero() { "reverted" } else { "success" },
            logs: receipt.logs.len(),
        }
    }
}

/// Display text for a terminal batch status
pub fn batch_status(status: &BatchStatus) -> Result<String, DemoError> {
    let view = BatchStatusView {
        id: &status.handle.0,
        status: status.state,
        status_code: serde_json::to_value(&status.payload.status)
            .map_err(|e| DemoError::failed(e.to_string()))?,
        atomic: status.payload.atomic,
        chain_id: status.payload.chain_id.map(|id| id.to_string()),
        receipts: status.payload.receipts.iter().map(ReceiptView::from).collect(),
    };

    safe_json(&view)
}

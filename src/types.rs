use ethers::types::{Address, Bytes, H256, U256, U64};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One call inside a batch submitted through `wallet_sendCalls`
///
/// Serialized with the EIP-5792 field names (`to`, `value`, `data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    #[serde(rename = "to")]
    pub destination: Address,
    pub value: U256,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Bytes>,
}

impl CallDescriptor {
    /// Plain value transfer with no calldata
    pub fn transfer(destination: Address, value: U256) -> Self {
        Self {
            destination,
            value,
            payload: None,
        }
    }

    /// Zero-value contract call
    pub fn contract_call(destination: Address, payload: Bytes) -> Self {
        Self {
            destination,
            value: U256::zero(),
            payload: Some(payload),
        }
    }
}

/// Ordered calls plus the caller's atomicity requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub calls: Vec<CallDescriptor>,
    pub atomic: bool,
}

impl BatchRequest {
    pub fn new(calls: Vec<CallDescriptor>, atomic: bool) -> Self {
        Self { calls, atomic }
    }
}

/// Opaque identifier the wallet returns for a submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchHandle(pub String);

impl fmt::Display for BatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `wallet_sendCalls` result
///
/// Wallets implementing the first EIP-5792 draft answer with a bare id string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum SendCallsResult {
    Handle(BatchHandle),
    Object {
        id: BatchHandle,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capabilities: Option<Value>,
    },
}

impl SendCallsResult {
    pub(crate) fn into_handle(self) -> BatchHandle {
        match self {
            SendCallsResult::Handle(handle) => handle,
            SendCallsResult::Object { id, .. } => id,
        }
    }
}

/// Local classification of a batch status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Pending,
    Confirmed,
    Failed,
}

/// Status field of `wallet_getCallsStatus`
///
/// Numeric codes follow EIP-5792 (1xx pending, 2xx confirmed, 4xx/5xx/6xx
/// failed). Older wallets report `PENDING` / `CONFIRMED` labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Code(u16),
    Label(String),
}

impl StatusCode {
    pub fn state(&self) -> BatchState {
        match self {
            StatusCode::Code(code) if (100..200).contains(code) => BatchState::Pending,
            StatusCode::Code(code) if (200..300).contains(code) => BatchState::Confirmed,
            StatusCode::Code(_) => BatchState::Failed,
            StatusCode::Label(label) => match label.to_ascii_uppercase().as_str() {
                "PENDING" => BatchState::Pending,
                "CONFIRMED" => BatchState::Confirmed,
                _ => BatchState::Failed,
            },
        }
    }
}

/// Raw `wallet_getCallsStatus` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U64>,
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,
    #[serde(default)]
    pub receipts: Vec<CallReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,
}

/// Receipt of one transaction included for a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReceipt {
    #[serde(default)]
    pub logs: Vec<Value>,
    pub status: U64,
    pub block_hash: H256,
    pub block_number: U256,
    pub gas_used: U256,
    pub transaction_hash: H256,
}

/// Snapshot of a batch as reported by the wallet
///
/// Each poll produces a fresh value; nothing here is mutated locally.
#[derive(Debug, Clone)]
pub struct BatchStatus {
    pub handle: BatchHandle,
    pub state: BatchState,
    pub payload: CallsStatus,
}

impl BatchStatus {
    pub fn from_payload(handle: BatchHandle, payload: CallsStatus) -> Self {
        Self {
            handle,
            state: payload.status.state(),
            payload,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state != BatchState::Pending
    }
}

/// `wallet_getCapabilities` result: hex chain id -> feature name -> provider
/// defined description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(pub BTreeMap<String, BTreeMap<String, Value>>);

impl Capabilities {
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Whether `feature` is usable on `chain_id`
    ///
    /// Understands both `{"status": "supported" | "ready"}` and the older
    /// `{"supported": true}` shape.
    pub fn supports(&self, chain_id: u64, feature: &str) -> bool {
        let key = format!("{:#x}", chain_id);
        let Some(entry) = self.0.get(&key).and_then(|features| features.get(feature)) else {
            return false;
        };

        match entry.get("status").and_then(Value::as_str) {
            Some(status) => status == "supported" || status == "ready",
            None => entry.get("supported").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes_map_to_states() {
        assert_eq!(StatusCode::Code(100).state(), BatchState::Pending);
        assert_eq!(StatusCode::Code(200).state(), BatchState::Confirmed);
        assert_eq!(StatusCode::Code(400).state(), BatchState::Failed);
        assert_eq!(StatusCode::Code(500).state(), BatchState::Failed);
        assert_eq!(StatusCode::Code(600).state(), BatchState::Failed);
        assert_eq!(StatusCode::Label("PENDING".into()).state(), BatchState::Pending);
        assert_eq!(StatusCode::Label("CONFIRMED".into()).state(), BatchState::Confirmed);
    }

    #[test]
    fn test_send_calls_result_accepts_both_shapes() {
        let bare: SendCallsResult = serde_json::from_value(json!("0xabc")).unwrap();
        assert_eq!(bare.into_handle(), BatchHandle("0xabc".into()));

        let object: SendCallsResult =
            serde_json::from_value(json!({ "id": "0xdef", "capabilities": {} })).unwrap();
        assert_eq!(object.into_handle(), BatchHandle("0xdef".into()));
    }

    #[test]
    fn test_capabilities_support_detection() {
        let capabilities: Capabilities = serde_json::from_value(json!({
            "0x2105": {
                "atomic": { "status": "ready" },
                "paymasterService": { "supported": true },
                "auxiliaryFunds": { "supported": false }
            }
        }))
        .unwrap();

        assert!(capabilities.supports(8453, "atomic"));
        assert!(capabilities.supports(8453, "paymasterService"));
        assert!(!capabilities.supports(8453, "auxiliaryFunds"));
        assert!(!capabilities.supports(10, "atomic"));
    }

    #[test]
    fn test_call_descriptor_wire_names() {
        let call = CallDescriptor::transfer(Address::zero(), U256::from(16));
        let value = serde_json::to_value(&call).unwrap();

        assert_eq!(value["value"], json!("0x10"));
        assert!(value.get("to").is_some());
        assert!(value.get("data").is_none());
    }
}

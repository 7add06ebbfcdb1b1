//! Scripted host transport for tests

use super::{HostError, HostErrorKind, HostTransport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Answers each method from a per-method FIFO of scripted results and
/// records every call it receives
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, HostError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, method: &str, value: Value) {
        self.push(method, Ok(value));
    }

    pub(crate) fn fail(&self, method: &str, err: HostError) {
        self.push(method, Err(err));
    }

    fn push(&self, method: &str, result: Result<Value, HostError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(result);
    }

    /// Params of every call made to `method`, oldest first
    pub(crate) fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HostTransport for ScriptedTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, HostError> {
        self.calls.lock().unwrap().push((method.to_string(), params));

        self.responses
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(HostError::new(
                    HostErrorKind::Unsupported,
                    format!("no scripted response for {}", method),
                ))
            })
    }
}

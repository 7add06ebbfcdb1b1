use crate::action::{ActionSlot, ActionState};
use crate::host::{MiniAppHost, SendTokenOptions, SwapTokenOptions};
use crate::render;
use crate::DemoError;
use serde_json::{Value, json};
use std::sync::Arc;

const BASE_USDC: &str = "eip155:8453/erc20:0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
const BASE_DEGEN: &str = "eip155:8453/erc20:0x4ed4e862860bed51a9570b96d89af5e1b0efefed";

/// Sell 1 USDC (6 decimals) for DEGEN on Base
pub fn usdc_to_degen_swap() -> SwapTokenOptions {
    SwapTokenOptions {
        sell_token: BASE_USDC.to_string(),
        buy_token: BASE_DEGEN.to_string(),
        sell_amount: "1000000".to_string(),
    }
}

/// Send 10 DEGEN (18 decimals) to 0x7291…57cd
pub fn degen_send() -> SendTokenOptions {
    SendTokenOptions {
        token: BASE_DEGEN.to_string(),
        amount: "10000000000000000000".to_string(),
        recipient_address: "0x729170d38dd5449604f35f349fdfcc9ad08257cd".to_string(),
    }
}

/// Host swap and send sheets
///
/// Results are shown as pretty JSON; host failures become
/// `{"error": true, "message": ...}` rather than an error state.
pub struct SwapsPanel {
    host: Arc<MiniAppHost>,
    swap: ActionSlot<String>,
    send: ActionSlot<String>,
}

impl SwapsPanel {
    pub fn new(host: Arc<MiniAppHost>) -> Self {
        Self {
            host,
            swap: ActionSlot::new("swap token"),
            send: ActionSlot::new("send token"),
        }
    }

    pub async fn swap(&self) -> ActionState<String> {
        self.swap
            .run(async { render_outcome(self.host.swap_token(&usdc_to_degen_swap()).await.map_err(DemoError::from)) })
            .await
    }

    pub async fn send(&self) -> ActionState<String> {
        self.send
            .run(async { render_outcome(self.host.send_token(&degen_send()).await.map_err(DemoError::from)) })
            .await
    }
}

fn render_outcome(outcome: Result<Value, DemoError>) -> Result<String, DemoError> {
    match outcome {
        Ok(result) => render::safe_json(&result),
        Err(e) => render::safe_json(&json!({ "error": true, "message": e.to_string() })),
    }
}

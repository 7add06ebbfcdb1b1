//! Tests for the wallet client and session
//!
//! Responses are pushed in reverse request order (`MockProvider` is LIFO).

#[cfg(test)]
mod tests {
    use crate::wallet::{DemoChain, WalletClient, WalletSession};
    use crate::{BatchHandle, BatchState, DemoError};
    use ethers::providers::{JsonRpcError, MockProvider, MockResponse, Provider};
    use ethers::types::Address;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn client() -> (WalletClient<MockProvider>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        (WalletClient::new(provider), mock)
    }

    fn respond(mock: &MockProvider, value: Value) {
        mock.push::<Value, _>(value).unwrap();
    }

    fn status(code: u16) -> Value {
        json!({ "id": "0x01", "status": code, "receipts": [] })
    }

    #[test]
    fn test_chain_cycle() {
        assert_eq!(DemoChain::next_after(Some(8453)), DemoChain::Optimism);
        assert_eq!(DemoChain::next_after(Some(10)), DemoChain::Degen);
        assert_eq!(DemoChain::next_after(Some(666666666)), DemoChain::Mainnet);
        assert_eq!(DemoChain::next_after(Some(1)), DemoChain::Unichain);
        assert_eq!(DemoChain::next_after(Some(130)), DemoChain::Base);
        assert_eq!(DemoChain::next_after(Some(10143)), DemoChain::Base);
        assert_eq!(DemoChain::next_after(None), DemoChain::Base);
        assert_eq!(DemoChain::from_id(10143), Some(DemoChain::MonadTestnet));
        assert_eq!(DemoChain::from_id(5), None);
    }

    #[tokio::test]
    async fn test_wait_polls_until_terminal() {
        let (client, mock) = client();
        respond(&mock, status(200));
        respond(&mock, status(100));
        respond(&mock, status(100));

        let handle = BatchHandle("0x01".into());
        let result = client
            .wait_for_calls_status(&handle, Duration::from_millis(1), None)
            .await
            .unwrap();

        assert_eq!(result.state, BatchState::Confirmed);
        for _ in 0..3 {
            mock.assert_request("wallet_getCallsStatus", ["0x01"]).unwrap();
        }
        assert!(mock.assert_request("wallet_getCallsStatus", ["0x01"]).is_err());
    }

    #[tokio::test]
    async fn test_wait_gives_up_after_timeout() {
        let (client, mock) = client();
        for _ in 0..64 {
            respond(&mock, status(100));
        }

        let handle = BatchHandle("0x01".into());
        let err = client
            .wait_for_calls_status(&handle, Duration::from_millis(20), Some(Duration::from_millis(50)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Timed out waiting for batch 0x01");
    }

    #[tokio::test]
    async fn test_wallet_rejection_classified() {
        let (client, mock) = client();
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: 4001,
            message: "User rejected the request.".into(),
            data: None,
        }));

        let err = client.sign_message(Address::zero(), "hi").await.unwrap_err();

        assert!(matches!(err, DemoError::RejectedByUser));
    }

    #[tokio::test]
    async fn test_other_rpc_errors_keep_wallet_message() {
        let (client, mock) = client();
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: -32000,
            message: "insufficient funds".into(),
            data: None,
        }));

        let err = client.chain_id().await.unwrap_err();

        assert!(matches!(err, DemoError::Wallet(_)));
        assert!(!err.is_user_rejection());
        assert!(err.user_message().contains("insufficient funds"));
    }

    #[tokio::test]
    async fn test_connect_remembers_first_account() {
        let (client, mock) = client();
        let first = Address::repeat_byte(0x01);
        respond(&mock, json!("0x2105"));
        respond(&mock, json!([first, Address::repeat_byte(0x02)]));
        let session = WalletSession::new(client);

        assert_eq!(session.connect().await.unwrap(), first);
        assert_eq!(session.account().await, Some(first));
        assert_eq!(session.chain_id().await, Some(8453));

        session.disconnect().await;
        assert!(!session.is_connected().await);
        assert_eq!(
            session.require_account().await.unwrap_err().to_string(),
            "No wallet client or address"
        );
    }

    #[tokio::test]
    async fn test_connect_with_no_accounts_fails() {
        let (client, mock) = client();
        respond(&mock, json!([]));
        let session = WalletSession::new(client);

        assert_eq!(
            session.connect().await.unwrap_err().to_string(),
            "Wallet returned no accounts"
        );
        assert!(!session.is_connected().await);
    }

    #[tokio::test]
    async fn test_switch_chain_updates_session() {
        let (client, mock) = client();
        respond(&mock, Value::Null);
        let session = WalletSession::connected(client, Address::zero(), 8453);

        session.switch_chain(DemoChain::Optimism).await.unwrap();

        assert_eq!(session.chain_id().await, Some(10));
        mock.assert_request("wallet_switchEthereumChain", [json!({ "chainId": "0xa" })])
            .unwrap();
    }
}

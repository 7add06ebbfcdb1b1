//! Tests for the HTTP backend
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`;
//! tokens are HS256-signed locally.

#[cfg(test)]
mod tests {
    use crate::api::testing::RecordingSender;
    use crate::api::{
        AuthError, HttpNotificationSender, Notification, NotificationSender, NotifyError, QuickAuthVerifier, SendOutcome,
        Server, SigningKey, TokenVerifier,
    };
    use crate::config::{AuthConfig, Config, TEST_CONFIG};
    use crate::host::NotificationDetails;
    use axum::body::{Body, to_bytes};
    use axum::extract::State;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, encode};
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const SECRET: &[u8] = b"quick-auth-test-secret";
    const ISSUER: &str = "https://auth.farcaster.xyz";
    const DOMAIN: &str = "demo.example.com";

    fn verifier() -> QuickAuthVerifier {
        QuickAuthVerifier::new(
            vec![SigningKey {
                kid: Some("k1".into()),
                algorithm: Algorithm::HS256,
                key: DecodingKey::from_secret(SECRET),
            }],
            ISSUER,
            DOMAIN,
        )
    }

    fn token(claims: Value) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("k1".into());
        encode(&header, &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn claims(sub: Value) -> Value {
        let exp = chrono::Utc::now().timestamp() + 3600;
        json!({ "sub": sub, "iss": ISSUER, "aud": DOMAIN, "exp": exp, "iat": exp - 3600 })
    }

    fn server(sender: Arc<RecordingSender>) -> Server {
        let config = Config::from_toml(TEST_CONFIG).unwrap();
        Server::new(config, Arc::new(verifier()), sender)
    }

    fn sent_ok() -> Result<SendOutcome, NotifyError> {
        Ok(SendOutcome::Sent)
    }

    fn rate_limited() -> Result<SendOutcome, NotifyError> {
        Ok(SendOutcome::RateLimited)
    }

    fn rejected() -> Result<SendOutcome, NotifyError> {
        Err(NotifyError::Rejected {
            status: 500,
            body: "boom".into(),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn me(authorization: Option<&str>) -> Request<Body> {
        let mut request = Request::builder().uri("/api/me");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        request.body(Body::empty()).unwrap()
    }

    fn notification_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/send-notification")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn details_body() -> Value {
        json!({
            "fid": 3,
            "notificationDetails": { "url": "https://api.example.com/notify", "token": "tok" }
        })
    }

    #[tokio::test]
    async fn test_me_without_header_is_401() {
        let app = server(Arc::new(RecordingSender::answering(sent_ok))).router();

        let response = app.oneshot(me(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "message": "Missing authorization header" }));
    }

    #[tokio::test]
    async fn test_me_with_valid_token_returns_fid() {
        let app = server(Arc::new(RecordingSender::answering(sent_ok))).router();
        let bearer = format!("Bearer {}", token(claims(json!("12345"))));

        let response = app.oneshot(me(Some(&bearer))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "fid": 12345 }));
    }

    #[tokio::test]
    async fn test_me_with_bad_tokens_is_401() {
        let mut wrong_audience = claims(json!(1));
        wrong_audience["aud"] = json!("other.example.com");
        let mut expired = claims(json!(1));
        expired["exp"] = json!(1_000_000);

        for bearer in [
            "Bearer not-a-jwt".to_string(),
            format!("Bearer {}", token(wrong_audience)),
            format!("Bearer {}", token(expired)),
            format!("Bearer {}", token(claims(json!("alice")))),
        ] {
            let app = server(Arc::new(RecordingSender::answering(sent_ok))).router();
            let response = app.oneshot(me(Some(&bearer))).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", bearer);
            assert!(json_body(response).await["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_unknown_kid_rejected() {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("rotated".into());
        let token = encode(&header, &claims(json!(1)), &EncodingKey::from_secret(SECRET)).unwrap();

        let err = verifier().verify(&token).await.unwrap_err();

        assert_eq!(err.to_string(), "Unknown signing key: rotated");
    }

    #[tokio::test]
    async fn test_send_notification_success() {
        let sender = Arc::new(RecordingSender::answering(sent_ok));
        let app = server(sender.clone()).router();

        let response = app.oneshot(notification_request(details_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "success": true }));

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.token, "tok");
        assert_eq!(sent[0].1.title, "Hello from Frames v2!");
        assert_eq!(sent[0].1.target_url, "https://demo.example.com");
    }

    #[tokio::test]
    async fn test_send_notification_status_mapping() {
        let cases: [(fn() -> Result<SendOutcome, NotifyError>, StatusCode); 2] = [
            (rate_limited, StatusCode::TOO_MANY_REQUESTS),
            (rejected, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (outcome, status) in cases {
            let app = server(Arc::new(RecordingSender::answering(outcome))).router();

            let response = app.oneshot(notification_request(details_body())).await.unwrap();

            assert_eq!(response.status(), status);
            assert_eq!(json_body(response).await["success"], false);
        }
    }

    #[tokio::test]
    async fn test_send_notification_invalid_body_is_400() {
        let sender = Arc::new(RecordingSender::answering(sent_ok));
        let app = server(sender.clone()).router();

        let response = app
            .oneshot(notification_request(json!({ "fid": 3 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_manifest_links_are_absolute() {
        let app = server(Arc::new(RecordingSender::answering(sent_ok))).router();
        let request = Request::builder()
            .uri("/.well-known/farcaster.json")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let manifest = json_body(response).await;
        assert_eq!(manifest["accountAssociation"]["header"], "h");
        assert_eq!(manifest["frame"]["name"], "Interview app");
        assert_eq!(manifest["frame"]["iconUrl"], "https://demo.example.com/icon.png");
        assert_eq!(manifest["frame"]["webhookUrl"], "https://demo.example.com/api/webhook");
        assert_eq!(manifest["frame"]["primaryCategory"], "social");
        assert_eq!(manifest["frame"]["homeUrl"], "https://demo.example.com");
    }

    #[tokio::test]
    async fn test_manifest_links_keep_public_url_path() {
        let mut config = Config::from_toml(TEST_CONFIG).unwrap();
        config.app.public_url = url::Url::parse("https://host.example/demo").unwrap();
        let sender = Arc::new(RecordingSender::answering(sent_ok));
        let app = Server::new(config, Arc::new(verifier()), sender).router();
        let request = Request::builder()
            .uri("/.well-known/farcaster.json")
            .body(Body::empty())
            .unwrap();

        let manifest = json_body(app.oneshot(request).await.unwrap()).await;

        assert_eq!(manifest["frame"]["homeUrl"], "https://host.example/demo");
        assert_eq!(manifest["frame"]["iconUrl"], "https://host.example/demo/icon.png");
        assert_eq!(manifest["frame"]["imageUrl"], "https://host.example/demo/image.png");
        assert_eq!(manifest["frame"]["splashImageUrl"], "https://host.example/demo/splash.png");
        assert_eq!(manifest["frame"]["webhookUrl"], "https://host.example/demo/api/webhook");
    }

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn notification_service(answer: Value) -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route(
                "/notify",
                post(|State((seen, answer)): State<(Received, Value)>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    Json(answer)
                }),
            )
            .with_state((received.clone(), answer));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/notify", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });
        (url, received)
    }

    fn notification() -> Notification {
        Notification {
            title: "t".into(),
            body: "b".into(),
            target_url: "https://demo.example.com/".into(),
        }
    }

    #[tokio::test]
    async fn test_http_sender_request_shape() {
        let (url, received) = notification_service(json!({
            "result": { "successfulTokens": ["tok"], "invalidTokens": [], "rateLimitedTokens": [] }
        }))
        .await;
        let details = NotificationDetails { url, token: "tok".into() };

        let outcome = HttpNotificationSender::default()
            .send(&details, &notification())
            .await
            .unwrap();

        assert_eq!(outcome, SendOutcome::Sent);
        let body = received.lock().unwrap()[0].clone();
        assert_eq!(body["tokens"], json!(["tok"]));
        assert_eq!(body["targetUrl"], "https://demo.example.com/");
        assert!(uuid::Uuid::parse_str(body["notificationId"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_http_sender_reports_rate_limit() {
        let (url, _received) = notification_service(json!({
            "result": { "successfulTokens": [], "invalidTokens": [], "rateLimitedTokens": ["tok"] }
        }))
        .await;
        let details = NotificationDetails { url, token: "tok".into() };

        let outcome = HttpNotificationSender::default()
            .send(&details, &notification())
            .await
            .unwrap();

        assert_eq!(outcome, SendOutcome::RateLimited);
    }

    const JWKS_SECRET: &[u8] = b"quick-auth-jwks-secret!!";
    const ROTATED_SECRET: &[u8] = b"quick-auth-rotated-key!!";

    /// Key server answering `failures` times with 503 before serving `keys`
    struct KeyServer {
        fetches: AtomicUsize,
        failures: AtomicUsize,
        keys: Mutex<Vec<Value>>,
    }

    async fn key_server(failures: usize, keys: Vec<Value>) -> (AuthConfig, Arc<KeyServer>) {
        let server = Arc::new(KeyServer {
            fetches: AtomicUsize::new(0),
            failures: AtomicUsize::new(failures),
            keys: Mutex::new(keys),
        });
        let app = Router::new()
            .route(
                "/jwks.json",
                get(|State(server): State<Arc<KeyServer>>| async move {
                    server.fetches.fetch_add(1, Ordering::SeqCst);
                    if server.failures.load(Ordering::SeqCst) > 0 {
                        server.failures.fetch_sub(1, Ordering::SeqCst);
                        return Err(StatusCode::SERVICE_UNAVAILABLE);
                    }
                    Ok(Json(json!({ "keys": server.keys.lock().unwrap().clone() })))
                }),
            )
            .with_state(server.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = AuthConfig {
            issuer: ISSUER.to_string(),
            jwks_url: format!("http://{}/jwks.json", listener.local_addr().unwrap()),
        };
        tokio::spawn(async move { axum::serve(listener, app).await });
        (config, server)
    }

    fn hmac_jwk(kid: &str, secret: &[u8]) -> Value {
        json!({ "kty": "oct", "kid": kid, "alg": "HS256", "k": URL_SAFE_NO_PAD.encode(secret) })
    }

    fn signed(kid: &str, secret: &[u8], sub: u64) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(kid.into());
        encode(&header, &claims(json!(sub)), &EncodingKey::from_secret(secret)).unwrap()
    }

    #[tokio::test]
    async fn test_keys_fetched_on_first_use_and_retried_after_failure() {
        let (config, keys) = key_server(1, vec![hmac_jwk("k1", JWKS_SECRET)]).await;
        let verifier = QuickAuthVerifier::with_jwks(&config, DOMAIN);
        assert_eq!(keys.fetches.load(Ordering::SeqCst), 0);

        let token = signed("k1", JWKS_SECRET, 12345);
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Jwks(_)), "{}", err);

        assert_eq!(verifier.verify(&token).await.unwrap(), 12345);
        assert_eq!(verifier.verify(&token).await.unwrap(), 12345);
        assert_eq!(keys.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rotated_kid_refetches_keys() {
        let (config, keys) = key_server(0, vec![hmac_jwk("k1", JWKS_SECRET)]).await;
        let verifier = QuickAuthVerifier::with_jwks(&config, DOMAIN);

        assert_eq!(verifier.verify(&signed("k1", JWKS_SECRET, 1)).await.unwrap(), 1);

        *keys.keys.lock().unwrap() = vec![hmac_jwk("k2", ROTATED_SECRET)];
        assert_eq!(verifier.verify(&signed("k2", ROTATED_SECRET, 2)).await.unwrap(), 2);
        assert_eq!(keys.fetches.load(Ordering::SeqCst), 2);

        let err = verifier.verify(&signed("k3", ROTATED_SECRET, 3)).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown signing key: k3");
    }

    #[tokio::test]
    async fn test_unreachable_key_server_is_500() {
        let config = AuthConfig {
            issuer: ISSUER.to_string(),
            jwks_url: "http://127.0.0.1:9/jwks.json".to_string(),
        };
        let verifier = QuickAuthVerifier::with_jwks(&config, DOMAIN);
        let app = Server::new(
            Config::from_toml(TEST_CONFIG).unwrap(),
            Arc::new(verifier),
            Arc::new(RecordingSender::answering(sent_ok)),
        )
        .router();
        let bearer = format!("Bearer {}", signed("k1", JWKS_SECRET, 1));

        let response = app.oneshot(me(Some(&bearer))).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_key_algorithm_follows_curve() {
        let p384: jsonwebtoken::jwk::Jwk = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "P-384",
            "kid": "ec",
            "x": "S9UB9-8cHN70FjeqLQbUZ8RpqfeEVxFTlZC_OU6HTRP4WDzAow56MVL9nqBPpuV7",
            "y": "epMcwls8CYxkpfwbkZTzNxTJFu67z2rO2xCGMu5AysfYKoY89v7MO3LtVUY4xb17"
        }))
        .unwrap();
        let ed: jsonwebtoken::jwk::Jwk = serde_json::from_value(json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "kid": "ed",
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
        }))
        .unwrap();

        let p384 = SigningKey::from_jwk(&p384).unwrap().unwrap();
        let ed = SigningKey::from_jwk(&ed).unwrap().unwrap();

        assert_eq!(p384.algorithm, Algorithm::ES384);
        assert_eq!(ed.algorithm, Algorithm::EdDSA);
        assert_eq!(ed.kid.as_deref(), Some("ed"));
    }

    #[test]
    fn test_hmac_key_without_alg_is_skipped() {
        let jwk: jsonwebtoken::jwk::Jwk = serde_json::from_value(json!({
            "kty": "oct",
            "k": URL_SAFE_NO_PAD.encode(JWKS_SECRET)
        }))
        .unwrap();

        assert!(SigningKey::from_jwk(&jwk).unwrap().is_none());
    }
}

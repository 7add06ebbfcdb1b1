use miniapp_demo::{
    api::{HttpNotificationSender, QuickAuthVerifier, Server},
    config::Config,
};
use std::sync::Arc;
use tracing::info;

/// The main entry point for the mini-app backend.
///
/// This function loads `.env`, initializes logging, loads the application
/// configuration and starts the API server. Quick-auth signing keys are
/// fetched by the verifier when the first token arrives.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the variables directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let config = Config::load("config/default.toml")?;
    info!("Mini-app backend starting with config: {:?}", config);

    // Tokens must be issued for the hostname the app is served from.
    let domain = config.auth_domain()?;
    let verifier = QuickAuthVerifier::with_jwks(&config.auth, domain.as_str());
    info!("Verifying quick-auth tokens for {}", domain);

    let notifier = HttpNotificationSender::new(reqwest::Client::new());

    let server = Server::new(config, Arc::new(verifier), Arc::new(notifier));
    server.start().await?;

    Ok(())
}

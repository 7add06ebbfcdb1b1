use clap::Parser;
use ethers::providers::{Http, Provider};
use miniapp_demo::{
    action::ActionState,
    batch::BatchPanel,
    config::Config,
    wallet::{WalletClient, WalletSession},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "batch-calls")]
#[command(about = "Runs the EIP-5792 batched-call demo against a wallet endpoint")]
struct Args {
    /// Require atomic execution of the transfer batch
    #[arg(long)]
    atomic: bool,
    #[arg(long, default_value = "config/default.toml")]
    config: String,
}

/// Headless run of the batched-call flow against the configured wallet.
///
/// Connects, probes capabilities, then submits the transfer batch and the
/// approve + transfer batch, printing each terminal state.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::load(&args.config)?;

    let provider = Provider::<Http>::try_from(config.wallet.rpc_url.as_str())?;
    let session = Arc::new(WalletSession::new(WalletClient::new(provider)));
    let account = session.connect().await?;
    info!("Connected {:?}", account);

    let panel = BatchPanel::new(session, config.wallet.poll_interval())
        .with_status_timeout(config.wallet.status_timeout());
    panel.set_force_atomic(args.atomic);

    report("capabilities", panel.get_capabilities().await);
    report("batch calls", panel.send_batch_calls().await);
    report("approve and transfer", panel.send_approve_and_transfer().await);

    Ok(())
}

fn report(name: &str, state: ActionState<String>) {
    match state {
        ActionState::Success(rendered) => println!("{}:\n{}", name, rendered),
        ActionState::Error(message) => error!("{} failed: {}", name, message),
        other => error!("{} ended in {:?}", name, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["batch-calls"]).unwrap();
        assert!(!args.atomic);
        assert_eq!(args.config, "config/default.toml");
    }

    #[test]
    fn test_args_atomic_and_config() {
        let args = Args::try_parse_from(["batch-calls", "--atomic", "--config", "local.toml"]).unwrap();
        assert!(args.atomic);
        assert_eq!(args.config, "local.toml");
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["batch-calls", "--atomc"]).is_err());
    }
}

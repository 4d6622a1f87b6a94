use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coordinator::Coordinator;
use pxe::{EnvironmentSet, RpcEnvironment, RpcNode};
use session::SessionStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "crowdfund", about = "Coordinate a private crowdfunding flow across three environments")]
struct Cli {
    /// Node the deployment targets
    #[arg(long, env = "NODE_URL", default_value = "http://localhost:8080")]
    node_url: String,

    /// Donor's private-execution environment
    #[arg(long, env = "PXE_DONOR_URL", default_value = "http://localhost:8081")]
    donor_url: String,

    /// Operator's private-execution environment
    #[arg(long, env = "PXE_OPERATOR_URL", default_value = "http://localhost:8082")]
    operator_url: String,

    /// Deployer's private-execution environment
    #[arg(long, env = "PXE_DEPLOYER_URL", default_value = "http://localhost:8083")]
    deployer_url: String,

    /// Session record shared across invocations
    #[arg(long, env = "SESSION_FILE", default_value = "session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision identities, deploy the token, and fund private balances
    Setup,
    /// Deploy the crowdfunding contract and register it everywhere
    Deploy,
    /// Donate private tokens to the campaign
    Donate {
        #[arg(long, default_value_t = 23)]
        amount: u128,
    },
    /// Withdraw funds from the campaign to the operator
    Withdraw {
        #[arg(long, default_value_t = 10)]
        amount: u128,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let envs = EnvironmentSet::new(
        Arc::new(RpcEnvironment::new(&cli.donor_url, "donor")),
        Arc::new(RpcEnvironment::new(&cli.operator_url, "operator")),
        Arc::new(RpcEnvironment::new(&cli.deployer_url, "deployer")),
    );
    let node = Arc::new(RpcNode::new(&cli.node_url));
    let store = SessionStore::new(cli.session_file);

    let coordinator = Coordinator::new(envs, node, store);

    match cli.command {
        Command::Setup => {
            let outcome = coordinator.setup().await?;
            tracing::info!(token = %outcome.token_address, "setup complete");
        }
        Command::Deploy => {
            let outcome = coordinator.deploy().await?;
            tracing::info!(address = %outcome.crowdfunding_address, "deploy complete");
        }
        Command::Donate { amount } => {
            let outcome = coordinator.donate(amount).await?;
            tracing::info!(
                tx_hash = %outcome.tx_hash,
                balance = outcome.balance_after,
                "donation complete"
            );
        }
        Command::Withdraw { amount } => {
            let outcome = coordinator.withdraw(amount).await?;
            tracing::info!(
                tx_hash = %outcome.tx_hash,
                contract_balance = outcome.contract_balance_after,
                "withdrawal complete"
            );
        }
    }

    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use solana_sdk::signer::keypair::read_keypair_file;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use votingdapp_client::config::from_toml_path;
use votingdapp_client::{ClientConfig, RpcChain, TransactionSubmitter, Wallet};

mod cli;
mod commands;
mod render;

use cli::Cli;
use commands::{now_ms, App};

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => from_toml_path(path)
            .with_context(|| format!("Unable to read config {}", path.display()))?,
        None => ClientConfig::default(),
    }
    .with_env_overrides()
    .with_rpc_url_override(cli.rpc_url.clone());

    if let Some(program_id) = &cli.program_id {
        config.program_id = program_id.clone();
    }
    Ok(config)
}

fn load_wallet(cli: &Cli) -> anyhow::Result<Option<Arc<dyn Wallet>>> {
    let Some(path) = &cli.keypair else {
        return Ok(None);
    };
    let keypair = read_keypair_file(path)
        .map_err(|e| anyhow::anyhow!("Unable to read keypair {}: {e}", path.display()))?;
    let wallet: Arc<dyn Wallet> = Arc::new(keypair);
    Ok(Some(wallet))
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = load_config(&cli)?;
    let program_id = config.program_id()?;

    let chain = Arc::new(RpcChain::new(config.rpc_url.clone(), config.commitment()?));
    tracing::debug!(rpc_url = %chain.url(), %program_id, "using endpoint");
    let submitter = TransactionSubmitter::new(chain, program_id, load_wallet(&cli)?)
        .with_retry_policy(config.retry_policy())
        .with_min_initialize_lamports(config.min_initialize_lamports);

    App::new(submitter).run(&cli.command, now_ms()).await
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

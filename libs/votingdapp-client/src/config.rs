use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::retry::RetryPolicy;

/// RPC endpoint used when neither the environment nor the config names one.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Environment variable overriding the configured RPC endpoint. Blank values are ignored.
pub const RPC_URL_ENV: &str = "VOTINGDAPP_RPC_URL";

/// Client configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Base58 id of the deployed program.
    pub program_id: String,
    /// Commitment level for reads: "processed", "confirmed" or "finalized".
    pub commitment: String,
    /// Attempts made by `initialize`.
    pub initialize_max_retries: u32,
    /// Backoff unit between `initialize` attempts.
    pub retry_base_delay_ms: u64,
    /// Balance the wallet must hold before `initialize` is attempted.
    pub min_initialize_lamports: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            program_id: votingdapp_interface::ID.to_string(),
            commitment: "confirmed".to_string(),
            initialize_max_retries: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: RetryPolicy::DEFAULT_BASE_DELAY.as_millis() as u64,
            min_initialize_lamports: votingdapp_interface::MIN_INITIALIZE_LAMPORTS,
        }
    }
}

impl ClientConfig {
    /// Replaces `rpc_url` with the value of [`RPC_URL_ENV`] when it is set and not blank.
    pub fn with_env_overrides(self) -> Self {
        self.with_rpc_url_override(std::env::var(RPC_URL_ENV).ok())
    }

    pub fn with_rpc_url_override(mut self, rpc_url: Option<String>) -> Self {
        if let Some(url) = rpc_url.filter(|url| !url.trim().is_empty()) {
            self.rpc_url = url.trim().to_string();
        }
        self
    }

    pub fn program_id(&self) -> anyhow::Result<Pubkey> {
        Pubkey::from_str(&self.program_id)
            .with_context(|| format!("Invalid program id: {}", self.program_id))
    }

    pub fn commitment(&self) -> anyhow::Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| anyhow::anyhow!("Invalid commitment level: {}", self.commitment))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.initialize_max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

/// Reads a TOML file into `R`.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let mut contents = String::new();
    {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    }

    let result: R = toml::from_str(&contents)?;

    Ok(result)
}

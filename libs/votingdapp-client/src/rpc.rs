use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::client_error::ClientError as RpcClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::debug;

use crate::chain::{ChainClient, ChainError, Wallet};

/// [`ChainClient`] backed by a single Solana JSON-RPC endpoint.
pub struct RpcChain {
    rpc: RpcClient,
}

impl RpcChain {
    pub fn new(rpc_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), commitment),
        }
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }
}

impl From<RpcClientError> for ChainError {
    fn from(err: RpcClientError) -> Self {
        ChainError::Rpc(err.to_string())
    }
}

#[async_trait]
impl ChainClient for RpcChain {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, ChainError> {
        Ok(self.rpc.get_balance(address).await?)
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, ChainError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0,
                discriminator,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let accounts = self
            .rpc
            .get_program_accounts_with_config(program_id, config)
            .await?;
        debug!(count = accounts.len(), %program_id, "fetched program accounts");

        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        wallet: &dyn Wallet,
    ) -> Result<Signature, ChainError> {
        let payer = wallet.identity();
        let blockhash = self.rpc.get_latest_blockhash().await?;

        let mut tx = Transaction::new_with_payer(instructions, Some(&payer));
        wallet.sign_transaction(&mut tx, blockhash)?;

        Ok(self.rpc.send_and_confirm_transaction(&tx).await?)
    }

    async fn confirm(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<(), ChainError> {
        self.rpc
            .poll_for_signature_with_commitment(signature, commitment)
            .await
            .map_err(|err| ChainError::Unconfirmed {
                signature: *signature,
                reason: err.to_string(),
            })
    }
}

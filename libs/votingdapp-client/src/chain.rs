use async_trait::async_trait;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};
use solana_sdk::transaction::Transaction;

/// Failures of the network collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Transaction {signature} was not confirmed: {reason}")]
    Unconfirmed { signature: Signature, reason: String },
}

/// Identity and signing capability of the acting user.
///
/// Any [`Signer`] is a wallet, so keypairs loaded from disk plug in directly.
pub trait Wallet: Send + Sync {
    fn identity(&self) -> Pubkey;

    fn sign_transaction(&self, tx: &mut Transaction, recent_blockhash: Hash)
        -> Result<(), ChainError>;
}

impl<S: Signer + Send + Sync> Wallet for S {
    fn identity(&self) -> Pubkey {
        self.pubkey()
    }

    fn sign_transaction(
        &self,
        tx: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), ChainError> {
        tx.try_sign(&[self], recent_blockhash)
            .map_err(|e| ChainError::Signing(e.to_string()))
    }
}

/// Everything the client needs from the network.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Raw data of the account at `address`, `None` when it does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError>;

    /// Balance of `address` in lamports.
    async fn balance(&self, address: &Pubkey) -> Result<u64, ChainError>;

    /// Every account owned by `program_id` whose data starts with `discriminator`.
    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, ChainError>;

    /// Signs `instructions` with `wallet` as fee payer and sends them.
    async fn submit(
        &self,
        instructions: &[Instruction],
        wallet: &dyn Wallet,
    ) -> Result<Signature, ChainError>;

    /// Waits until `signature` reaches `commitment`.
    async fn confirm(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<(), ChainError>;
}

use solana_sdk::pubkey::Pubkey;

use crate::chain::ChainError;

/// Errors surfaced to the user by the reader and the submitter.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Program is already initialized")]
    AlreadyInitialized,

    #[error(
        "Insufficient balance. You have {balance_sol:.4} SOL but need at least {required_sol} SOL for initialization."
    )]
    InsufficientBalance { balance_sol: f64, required_sol: f64 },

    #[error("Initialization failed after {attempts} attempts. Last error: {last_error}")]
    InitializeFailed { attempts: u32, last_error: String },

    #[error("No account found at {0}")]
    AccountNotFound(Pubkey),

    #[error("Account {address} could not be decoded: {reason}")]
    Decode { address: Pubkey, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

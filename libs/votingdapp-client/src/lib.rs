//! Client for the votingdapp on-chain program.
//!
//! [`AccountReader`] turns program accounts into view models and
//! [`TransactionSubmitter`] sends the program's instructions. Both talk to the
//! network through a [`ChainClient`]; [`RpcChain`] is the production
//! implementation.

mod chain;
pub mod config;
mod error;
#[cfg(any(test, feature = "mocks"))]
pub mod mock;
mod reader;
mod retry;
mod rpc;
mod submitter;
mod view;

pub use chain::{ChainClient, ChainError, Wallet};
pub use config::ClientConfig;
pub use error::ClientError;
pub use reader::{AccountReader, NOT_INITIALIZED};
pub use retry::RetryPolicy;
pub use rpc::RpcChain;
pub use submitter::{CandidateRegistration, TransactionSubmitter};
pub use view::{CandidateView, PollDetail, PollStatus, PollView};
pub use votingdapp_interface as interface;

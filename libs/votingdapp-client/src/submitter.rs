use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anchor_lang::system_program;
use backoff::future::retry;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tokio::sync::Mutex;
use tracing::{info, warn};
use votingdapp_interface::{
    accounts, build_instruction, candidate_address, counter_address, instruction, poll_address,
    registrations_address, voter_address, LAMPORTS_PER_SOL, MIN_INITIALIZE_LAMPORTS,
};

use crate::chain::{ChainClient, ChainError, Wallet};
use crate::error::ClientError;
use crate::reader::AccountReader;
use crate::retry::RetryPolicy;

/// Result of a confirmed candidate registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRegistration {
    pub signature: Signature,
    pub address: Pubkey,
    /// Id stored in the confirmed candidate account.
    pub cid: u64,
}

/// Builds, signs and sends the program's state-changing instructions.
///
/// Every call waits for finalized confirmation before returning. Only
/// [`initialize`](Self::initialize) retries, following its [`RetryPolicy`];
/// other failures are returned as-is.
pub struct TransactionSubmitter<C> {
    chain: Arc<C>,
    reader: AccountReader<C>,
    wallet: Option<Arc<dyn Wallet>>,
    retry: RetryPolicy,
    min_initialize_lamports: u64,
}

impl<C: ChainClient> TransactionSubmitter<C> {
    pub fn new(chain: Arc<C>, program_id: Pubkey, wallet: Option<Arc<dyn Wallet>>) -> Self {
        Self {
            reader: AccountReader::new(Arc::clone(&chain), program_id),
            chain,
            wallet,
            retry: RetryPolicy::default(),
            min_initialize_lamports: MIN_INITIALIZE_LAMPORTS,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_min_initialize_lamports(mut self, lamports: u64) -> Self {
        self.min_initialize_lamports = lamports;
        self
    }

    pub fn reader(&self) -> &AccountReader<C> {
        &self.reader
    }

    /// Public key of the connected wallet, if any.
    pub fn identity(&self) -> Option<Pubkey> {
        self.wallet.as_ref().map(|wallet| wallet.identity())
    }

    fn program_id(&self) -> &Pubkey {
        self.reader.program_id()
    }

    fn wallet(&self) -> Result<&dyn Wallet, ClientError> {
        self.wallet
            .as_deref()
            .ok_or(ClientError::WalletNotConnected)
    }

    /// Creates the Counter and Registrations singletons, retrying with the configured policy.
    pub async fn initialize(&self) -> Result<Signature, ClientError> {
        self.initialize_with_retries(self.retry.max_attempts).await
    }

    /// Creates the program singletons, making at most `max_retries` attempts.
    ///
    /// Fails without attempting anything if the singletons already exist or
    /// the wallet cannot pay for them.
    pub async fn initialize_with_retries(&self, max_retries: u32) -> Result<Signature, ClientError> {
        let wallet = self.wallet()?;
        let user = wallet.identity();

        if self.reader.accounts_exist().await {
            return Err(ClientError::AlreadyInitialized);
        }

        let balance = match self.chain.balance(&user).await {
            Ok(lamports) => lamports,
            Err(err) => {
                warn!(%user, %err, "error checking balance");
                0
            }
        };
        if balance < self.min_initialize_lamports {
            return Err(ClientError::InsufficientBalance {
                balance_sol: balance as f64 / LAMPORTS_PER_SOL as f64,
                required_sol: self.min_initialize_lamports as f64 / LAMPORTS_PER_SOL as f64,
            });
        }

        let ix = build_instruction(
            self.program_id(),
            &accounts::Initialize {
                user,
                counter: counter_address(self.program_id()),
                registration: registrations_address(self.program_id()),
                system_program: system_program::ID,
            },
            &instruction::Initialize {},
        );

        if max_retries == 0 {
            return Err(ClientError::InitializeFailed {
                attempts: 0,
                last_error: "Unknown error".to_string(),
            });
        }

        let attempts = AtomicU32::new(0);
        // Signature of an attempt that was sent but not seen finalized
        let unconfirmed: Mutex<Option<Signature>> = Mutex::new(None);

        let outcome = retry(self.retry.with_max_attempts(max_retries), || {
            let ix = ix.clone();
            let (attempts, unconfirmed) = (&attempts, &unconfirmed);
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;

                // An earlier attempt may have landed after its confirmation timed out
                if attempt > 1 && self.reader.accounts_exist().await {
                    return match unconfirmed.lock().await.take() {
                        Some(signature) => {
                            info!(%signature, "earlier initialization attempt landed");
                            Ok(signature)
                        }
                        None => Err(backoff::Error::permanent(ClientError::AlreadyInitialized)),
                    };
                }

                info!(attempt, max_retries, "initialization attempt");
                match self.submit_finalized(&[ix], wallet).await {
                    Ok(signature) => {
                        info!(%signature, "initialization successful");
                        Ok(signature)
                    }
                    Err(err) => {
                        warn!(attempt, %err, "initialization attempt failed");
                        if let ChainError::Unconfirmed { signature, .. } = &err {
                            *unconfirmed.lock().await = Some(*signature);
                        }
                        Err(backoff::Error::transient(ClientError::Chain(err)))
                    }
                }
            }
        })
        .await;

        outcome.map_err(|err| match err {
            ClientError::Chain(last_error) => ClientError::InitializeFailed {
                attempts: attempts.load(Ordering::SeqCst),
                last_error: last_error.to_string(),
            },
            other => other,
        })
    }

    /// Creates poll `next_id`, which must be the counter value plus one.
    pub async fn create_poll(
        &self,
        next_id: u64,
        description: &str,
        start: u64,
        end: u64,
    ) -> Result<Signature, ClientError> {
        let wallet = self.wallet()?;
        if description.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "poll description must not be empty".to_string(),
            ));
        }
        if end <= start {
            return Err(ClientError::InvalidInput(
                "poll must end after it starts".to_string(),
            ));
        }

        let ix = build_instruction(
            self.program_id(),
            &accounts::CreatePoll {
                user: wallet.identity(),
                counter: counter_address(self.program_id()),
                poll: poll_address(self.program_id(), next_id),
                system_program: system_program::ID,
            },
            &instruction::CreatePoll {
                description: description.to_string(),
                start,
                end,
            },
        );

        let signature = self.submit_finalized(&[ix], wallet).await?;
        info!(%signature, poll_id = next_id, "poll created");
        Ok(signature)
    }

    /// Registers `name` as a candidate in `poll_id`.
    ///
    /// The candidate address is derived from the Registrations count plus one.
    /// A concurrent registration taking the same id makes the program reject
    /// this one; the returned id is read back from the confirmed account.
    pub async fn register_candidate(
        &self,
        poll_id: u64,
        name: &str,
    ) -> Result<CandidateRegistration, ClientError> {
        let wallet = self.wallet()?;
        if name.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "candidate name must not be empty".to_string(),
            ));
        }

        let predicted_cid = self.reader.fetch_registrations().await? + 1;
        let candidate = candidate_address(self.program_id(), poll_id, predicted_cid);

        let ix = build_instruction(
            self.program_id(),
            &accounts::RegisterCandidate {
                user: wallet.identity(),
                poll: poll_address(self.program_id(), poll_id),
                registration: registrations_address(self.program_id()),
                candidate,
                system_program: system_program::ID,
            },
            &instruction::RegisterCandidate {
                poll_id,
                name: name.to_string(),
            },
        );

        let signature = self.submit_finalized(&[ix], wallet).await?;

        let cid = match self.reader.fetch_candidate_at(&candidate).await {
            Ok(confirmed) => confirmed.cid,
            Err(err) => {
                warn!(%candidate, %err, predicted_cid, "could not read back registered candidate");
                predicted_cid
            }
        };
        info!(%signature, poll_id, cid, "candidate registered");

        Ok(CandidateRegistration {
            signature,
            address: candidate,
            cid,
        })
    }

    /// Casts the wallet's vote for candidate `cid` in `poll_id`.
    pub async fn vote(&self, poll_id: u64, cid: u64) -> Result<Signature, ClientError> {
        let wallet = self.wallet()?;
        let user = wallet.identity();

        let ix = build_instruction(
            self.program_id(),
            &accounts::Vote {
                user,
                poll: poll_address(self.program_id(), poll_id),
                candidate: candidate_address(self.program_id(), poll_id, cid),
                voter: voter_address(self.program_id(), poll_id, &user),
                system_program: system_program::ID,
            },
            &instruction::Vote { poll_id, cid },
        );

        let signature = self.submit_finalized(&[ix], wallet).await?;
        info!(%signature, poll_id, cid, "vote cast");
        Ok(signature)
    }

    async fn submit_finalized(
        &self,
        instructions: &[Instruction],
        wallet: &dyn Wallet,
    ) -> Result<Signature, ChainError> {
        let signature = self.chain.submit(instructions, wallet).await?;
        self.chain
            .confirm(&signature, CommitmentConfig::finalized())
            .await?;
        Ok(signature)
    }
}

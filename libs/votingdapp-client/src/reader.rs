use std::sync::Arc;

use anchor_lang::{AccountDeserialize, Discriminator};
use solana_sdk::pubkey::Pubkey;
use tracing::{error, warn};
use votingdapp_interface::{
    counter_address, poll_address, registrations_address, voter_address, Candidate, Counter,
    Poll, Registrations, Voter,
};

use crate::chain::ChainClient;
use crate::error::ClientError;
use crate::view::{CandidateView, PollDetail, PollView};

/// Value of [`AccountReader::fetch_counter`] when the program has not been initialized.
pub const NOT_INITIALIZED: i64 = -1;

/// Reads program accounts and normalizes them into view models.
///
/// Reads that feed lists or flags never fail: errors are logged and mapped to
/// an empty list, `false` or [`NOT_INITIALIZED`]. Reads of a single named
/// account return an error instead.
pub struct AccountReader<C> {
    chain: Arc<C>,
    program_id: Pubkey,
}

impl<C> Clone for AccountReader<C> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            program_id: self.program_id,
        }
    }
}

impl<C: ChainClient> AccountReader<C> {
    pub fn new(chain: Arc<C>, program_id: Pubkey) -> Self {
        Self { chain, program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Current poll count, or [`NOT_INITIALIZED`] if the counter is missing or unreadable.
    pub async fn fetch_counter(&self) -> i64 {
        let address = counter_address(&self.program_id);
        match self.fetch_account::<Counter>(&address).await {
            Ok(Some(counter)) => i64::try_from(counter.count).unwrap_or(i64::MAX),
            Ok(None) => {
                warn!(%address, "no counter account found");
                NOT_INITIALIZED
            }
            Err(err) => {
                error!(%address, %err, "failed to retrieve counter");
                NOT_INITIALIZED
            }
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.fetch_counter().await >= 0
    }

    /// Id the next created poll will get, `None` before initialization.
    pub async fn next_poll_id(&self) -> Option<u64> {
        u64::try_from(self.fetch_counter().await)
            .ok()
            .map(|count| count + 1)
    }

    pub async fn fetch_registrations(&self) -> Result<u64, ClientError> {
        let address = registrations_address(&self.program_id);
        let registrations = self
            .fetch_account::<Registrations>(&address)
            .await?
            .ok_or(ClientError::AccountNotFound(address))?;
        Ok(registrations.count)
    }

    pub async fn fetch_poll(&self, poll_id: u64) -> Result<PollView, ClientError> {
        self.fetch_poll_at(&poll_address(&self.program_id, poll_id))
            .await
    }

    pub async fn fetch_poll_at(&self, address: &Pubkey) -> Result<PollView, ClientError> {
        let poll = self
            .fetch_account::<Poll>(address)
            .await?
            .ok_or(ClientError::AccountNotFound(*address))?;
        Ok(PollView::from_account(*address, poll))
    }

    /// All polls, in the order the network returns them.
    pub async fn fetch_all_polls(&self) -> Vec<PollView> {
        match self.fetch_all::<Poll>().await {
            Ok(polls) => polls
                .into_iter()
                .map(|(address, poll)| PollView::from_account(address, poll))
                .collect(),
            Err(err) => {
                error!(%err, "failed to fetch polls");
                Vec::new()
            }
        }
    }

    pub async fn fetch_candidate_at(&self, address: &Pubkey) -> Result<CandidateView, ClientError> {
        let candidate = self
            .fetch_account::<Candidate>(address)
            .await?
            .ok_or(ClientError::AccountNotFound(*address))?;
        Ok(CandidateView::from_account(*address, candidate))
    }

    /// Candidates of `poll_id`.
    ///
    /// Fetches every candidate of every poll and filters locally, so the
    /// cost grows with the total number of candidates on the program.
    pub async fn fetch_candidates_for_poll(&self, poll_id: u64) -> Vec<CandidateView> {
        match self.fetch_all::<Candidate>().await {
            Ok(candidates) => candidates
                .into_iter()
                .filter(|(_, candidate)| candidate.belongs_to(poll_id))
                .map(|(address, candidate)| CandidateView::from_account(address, candidate))
                .collect(),
            Err(err) => {
                error!(poll_id, %err, "failed to fetch candidates");
                Vec::new()
            }
        }
    }

    /// The poll at `address` together with its candidates.
    pub async fn fetch_poll_detail(&self, address: &Pubkey) -> Result<PollDetail, ClientError> {
        let poll = self.fetch_poll_at(address).await?;
        let mut candidates = self.fetch_candidates_for_poll(poll.id).await;
        candidates.sort_by_key(|c| c.cid);
        Ok(PollDetail { poll, candidates })
    }

    /// Whether `voter` has voted in `poll_id`.
    ///
    /// A read error reports `false`, the same as a voter who never voted.
    pub async fn has_voted(&self, poll_id: u64, voter: &Pubkey) -> bool {
        let address = voter_address(&self.program_id, poll_id, voter);
        match self.fetch_account::<Voter>(&address).await {
            Ok(Some(record)) => record.has_voted,
            Ok(None) => false,
            Err(err) => {
                error!(%address, %err, "error fetching voter account");
                false
            }
        }
    }

    /// Whether the program singletons already exist. Probe failures count as absent.
    pub async fn accounts_exist(&self) -> bool {
        let address = counter_address(&self.program_id);
        match self.chain.account_data(&address).await {
            Ok(data) => data.is_some_and(|data| !data.is_empty()),
            Err(err) => {
                error!(%address, %err, "error checking account existence");
                false
            }
        }
    }

    async fn fetch_account<T: AccountDeserialize>(
        &self,
        address: &Pubkey,
    ) -> Result<Option<T>, ClientError> {
        let Some(data) = self.chain.account_data(address).await? else {
            return Ok(None);
        };
        T::try_deserialize(&mut data.as_slice())
            .map(Some)
            .map_err(|err| ClientError::Decode {
                address: *address,
                reason: err.to_string(),
            })
    }

    async fn fetch_all<T: AccountDeserialize + Discriminator>(
        &self,
    ) -> Result<Vec<(Pubkey, T)>, ClientError> {
        let raw = self
            .chain
            .program_accounts(&self.program_id, T::DISCRIMINATOR)
            .await?;

        let mut accounts = Vec::with_capacity(raw.len());
        for (address, data) in raw {
            match T::try_deserialize(&mut data.as_slice()) {
                Ok(account) => accounts.push((address, account)),
                Err(err) => warn!(%address, %err, "skipping undecodable account"),
            }
        }
        Ok(accounts)
    }
}

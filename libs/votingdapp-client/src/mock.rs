//! In-memory stand-in for the network and the deployed program.
//!
//! [`MockChain`] keeps program accounts in their real Anchor encoding and
//! applies the four votingdapp instructions with the program's account
//! rules, so reader and submitter run unchanged against it. Submission and
//! read failures can be injected.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use anchor_lang::{AccountDeserialize, AccountSerialize, AnchorDeserialize, Discriminator};
use async_trait::async_trait;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tokio::time::Instant;
use votingdapp_interface::{
    candidate_address, instruction, poll_address, voter_address, Candidate, Counter, Poll,
    Registrations, Voter, DISCRIMINATOR_SIZE,
};

use crate::chain::{ChainClient, ChainError, Wallet};

#[derive(Default)]
struct Ledger {
    accounts: BTreeMap<Pubkey, Vec<u8>>,
    balances: HashMap<Pubkey, u64>,
    pending_submit_failures: VecDeque<ChainError>,
    fail_reads: bool,
    submit_attempts: Vec<Instant>,
    pending_confirm_failures: usize,
    landed: Vec<Signature>,
    confirmed: Vec<Signature>,
}

pub struct MockChain {
    program_id: Pubkey,
    ledger: Mutex<Ledger>,
}

impl MockChain {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap()
    }

    pub fn set_balance(&self, address: Pubkey, lamports: u64) {
        self.ledger().balances.insert(address, lamports);
    }

    /// The next `count` submissions fail with `error` before touching state.
    pub fn fail_next_submits(&self, count: usize, error: ChainError) {
        let mut ledger = self.ledger();
        for _ in 0..count {
            ledger.pending_submit_failures.push_back(error.clone());
        }
    }

    /// The next `count` confirmations time out even though the transaction landed.
    pub fn fail_next_confirms(&self, count: usize) {
        self.ledger().pending_confirm_failures += count;
    }

    /// While set, every account read fails.
    pub fn fail_reads(&self, fail: bool) {
        self.ledger().fail_reads = fail;
    }

    /// Time of every submission attempt, successful or not.
    pub fn submit_attempts(&self) -> Vec<Instant> {
        self.ledger().submit_attempts.clone()
    }

    /// Signatures that reached finality through [`ChainClient::confirm`], in order.
    pub fn confirmed_signatures(&self) -> Vec<Signature> {
        self.ledger().confirmed.clone()
    }

    pub fn insert_account<T: AccountSerialize>(&self, address: Pubkey, account: &T) {
        let mut data = Vec::new();
        account.try_serialize(&mut data).unwrap();
        self.ledger().accounts.insert(address, data);
    }

    pub fn insert_raw(&self, address: Pubkey, data: Vec<u8>) {
        self.ledger().accounts.insert(address, data);
    }

    pub fn account<T: AccountDeserialize>(&self, address: &Pubkey) -> Option<T> {
        let ledger = self.ledger();
        let data = ledger.accounts.get(address)?;
        T::try_deserialize(&mut data.as_slice()).ok()
    }

    fn apply(
        &self,
        accounts: &mut BTreeMap<Pubkey, Vec<u8>>,
        ix: &Instruction,
        signer: &Pubkey,
    ) -> Result<(), ChainError> {
        if ix.program_id != self.program_id {
            return Err(rejected("unknown program"));
        }
        if ix.accounts.first().map(|meta| meta.pubkey) != Some(*signer) {
            return Err(rejected("missing required signature"));
        }
        if ix.data.len() < DISCRIMINATOR_SIZE {
            return Err(rejected("instruction data too short"));
        }
        let (discriminator, mut args) = ix.data.split_at(DISCRIMINATOR_SIZE);
        let key = |index: usize| -> Result<Pubkey, ChainError> {
            ix.accounts
                .get(index)
                .map(|meta| meta.pubkey)
                .ok_or_else(|| rejected("not enough account keys"))
        };

        if discriminator == instruction::Initialize::DISCRIMINATOR {
            let (counter, registration) = (key(1)?, key(2)?);
            create(accounts, counter, &Counter { count: 0 })?;
            create(accounts, registration, &Registrations { count: 0 })?;
        } else if discriminator == instruction::CreatePoll::DISCRIMINATOR {
            let args = decode_args::<instruction::CreatePoll>(&mut args)?;
            let (counter_key, poll_key) = (key(1)?, key(2)?);
            let mut counter: Counter = load(accounts, &counter_key)?;
            counter.count += 1;
            if poll_key != poll_address(&self.program_id, counter.count) {
                return Err(rejected("seeds constraint violated: poll"));
            }
            create(
                accounts,
                poll_key,
                &Poll {
                    id: counter.count,
                    description: args.description,
                    start: args.start,
                    end: args.end,
                    candidates: 0,
                },
            )?;
            store(accounts, counter_key, &counter);
        } else if discriminator == instruction::RegisterCandidate::DISCRIMINATOR {
            let args = decode_args::<instruction::RegisterCandidate>(&mut args)?;
            let (poll_key, registration_key, candidate_key) = (key(1)?, key(2)?, key(3)?);
            let mut poll: Poll = load(accounts, &poll_key)?;
            let mut registrations: Registrations = load(accounts, &registration_key)?;
            registrations.count += 1;
            if candidate_key != candidate_address(&self.program_id, args.poll_id, registrations.count)
            {
                return Err(rejected("seeds constraint violated: candidate"));
            }
            create(
                accounts,
                candidate_key,
                &Candidate {
                    cid: registrations.count,
                    poll_id: args.poll_id,
                    name: args.name,
                    votes: 0,
                },
            )?;
            poll.candidates += 1;
            store(accounts, poll_key, &poll);
            store(accounts, registration_key, &registrations);
        } else if discriminator == instruction::Vote::DISCRIMINATOR {
            let args = decode_args::<instruction::Vote>(&mut args)?;
            let (candidate_key, voter_key) = (key(2)?, key(3)?);
            let poll_key = key(1)?;
            if poll_key != poll_address(&self.program_id, args.poll_id) {
                return Err(rejected("seeds constraint violated: poll"));
            }
            let _poll: Poll = load(accounts, &poll_key)?;
            let mut candidate: Candidate = load(accounts, &candidate_key)?;
            if candidate.poll_id != args.poll_id
                || candidate_key != candidate_address(&self.program_id, args.poll_id, args.cid)
            {
                return Err(rejected("seeds constraint violated: candidate"));
            }
            if voter_key != voter_address(&self.program_id, args.poll_id, signer) {
                return Err(rejected("seeds constraint violated: voter"));
            }
            create(accounts, voter_key, &Voter { has_voted: true })?;
            candidate.votes += 1;
            store(accounts, candidate_key, &candidate);
        } else {
            return Err(rejected("unknown instruction"));
        }
        Ok(())
    }
}

fn rejected(reason: &str) -> ChainError {
    ChainError::Rejected(reason.to_string())
}

fn decode_args<T: AnchorDeserialize>(args: &mut &[u8]) -> Result<T, ChainError> {
    T::deserialize(args).map_err(|e| rejected(&format!("invalid instruction data: {e}")))
}

fn load<T: AccountDeserialize>(
    accounts: &BTreeMap<Pubkey, Vec<u8>>,
    address: &Pubkey,
) -> Result<T, ChainError> {
    let data = accounts
        .get(address)
        .ok_or_else(|| rejected("account not initialized"))?;
    T::try_deserialize(&mut data.as_slice()).map_err(|e| rejected(&e.to_string()))
}

fn store<T: AccountSerialize>(accounts: &mut BTreeMap<Pubkey, Vec<u8>>, address: Pubkey, value: &T) {
    let mut data = Vec::new();
    value.try_serialize(&mut data).unwrap();
    accounts.insert(address, data);
}

fn create<T: AccountSerialize>(
    accounts: &mut BTreeMap<Pubkey, Vec<u8>>,
    address: Pubkey,
    value: &T,
) -> Result<(), ChainError> {
    if accounts.contains_key(&address) {
        return Err(rejected("account already in use"));
    }
    store(accounts, address, value);
    Ok(())
}

#[async_trait]
impl ChainClient for MockChain {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        let ledger = self.ledger();
        if ledger.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(ledger.accounts.get(address).cloned())
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, ChainError> {
        let ledger = self.ledger();
        if ledger.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(ledger.balances.get(address).copied().unwrap_or_default())
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, ChainError> {
        let ledger = self.ledger();
        if ledger.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        if *program_id != self.program_id {
            return Ok(Vec::new());
        }
        Ok(ledger
            .accounts
            .iter()
            .filter(|(_, data)| data.starts_with(discriminator))
            .map(|(address, data)| (*address, data.clone()))
            .collect())
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        wallet: &dyn Wallet,
    ) -> Result<Signature, ChainError> {
        let signer = wallet.identity();
        let mut ledger = self.ledger();
        ledger.submit_attempts.push(Instant::now());
        if let Some(err) = ledger.pending_submit_failures.pop_front() {
            return Err(err);
        }

        // All or nothing, like a transaction
        let mut accounts = ledger.accounts.clone();
        for ix in instructions {
            self.apply(&mut accounts, ix, &signer)?;
        }
        ledger.accounts = accounts;

        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&(ledger.landed.len() as u64 + 1).to_le_bytes());
        let signature = Signature::from(bytes);
        ledger.landed.push(signature);
        Ok(signature)
    }

    async fn confirm(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<(), ChainError> {
        let mut ledger = self.ledger();
        if !ledger.landed.contains(signature) {
            return Err(ChainError::Unconfirmed {
                signature: *signature,
                reason: "unknown signature".to_string(),
            });
        }
        if ledger.pending_confirm_failures > 0 {
            ledger.pending_confirm_failures -= 1;
            return Err(ChainError::Unconfirmed {
                signature: *signature,
                reason: "timed out waiting for finalization".to_string(),
            });
        }
        if !ledger.confirmed.contains(signature) {
            ledger.confirmed.push(*signature);
        }
        Ok(())
    }
}

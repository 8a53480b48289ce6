//! Program-derived addresses of every account the votingdapp program owns.
//!
//! Addresses are a pure function of the seeds and the program id, so the
//! client never stores them.

use anchor_lang::prelude::*;

use crate::constants::*;

/// Canonical program-derived address of `seeds` under `program_id`.
pub fn derive_address(program_id: &Pubkey, seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, program_id).0
}

pub fn counter_address(program_id: &Pubkey) -> Pubkey {
    derive_address(program_id, &[COUNTER_SEED])
}

pub fn registrations_address(program_id: &Pubkey) -> Pubkey {
    derive_address(program_id, &[REGISTRATION_SEED])
}

pub fn poll_address(program_id: &Pubkey, poll_id: u64) -> Pubkey {
    derive_address(program_id, &[poll_id.to_le_bytes().as_ref()])
}

pub fn candidate_address(program_id: &Pubkey, poll_id: u64, cid: u64) -> Pubkey {
    derive_address(
        program_id,
        &[poll_id.to_le_bytes().as_ref(), cid.to_le_bytes().as_ref()],
    )
}

pub fn voter_address(program_id: &Pubkey, poll_id: u64, voter: &Pubkey) -> Pubkey {
    derive_address(
        program_id,
        &[VOTER_SEED, poll_id.to_le_bytes().as_ref(), voter.as_ref()],
    )
}

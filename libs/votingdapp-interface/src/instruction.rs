//! Instruction payloads of the votingdapp program.
//!
//! Each payload serializes as its 8-byte Anchor sighash,
//! `sha256("global:<name>")[..8]`, followed by the Borsh-encoded arguments.

use anchor_lang::prelude::*;
use anchor_lang::InstructionData;

// Create the Counter and Registrations singletons
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Initialize {}

// Create a poll at the next counter id
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatePoll {
    pub description: String,
    // unix seconds
    pub start: u64,
    pub end: u64,
}

// Register a candidate in an existing poll
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterCandidate {
    pub poll_id: u64,
    pub name: String,
}

// Cast one vote for a candidate
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: u64,
    pub cid: u64,
}

impl Discriminator for Initialize {
    const DISCRIMINATOR: &'static [u8] = &[175, 175, 109, 31, 13, 152, 155, 237];
}

impl Discriminator for CreatePoll {
    const DISCRIMINATOR: &'static [u8] = &[182, 171, 112, 238, 6, 219, 14, 110];
}

impl Discriminator for RegisterCandidate {
    const DISCRIMINATOR: &'static [u8] = &[91, 136, 96, 222, 242, 4, 160, 182];
}

impl Discriminator for Vote {
    const DISCRIMINATOR: &'static [u8] = &[227, 110, 155, 23, 136, 126, 172, 25];
}

impl InstructionData for Initialize {}
impl InstructionData for CreatePoll {}
impl InstructionData for RegisterCandidate {}
impl InstructionData for Vote {}

#[cfg(test)]
mod tests {
    use anchor_lang::solana_program::hash::hash;

    use super::*;

    fn sighash(name: &str) -> [u8; 8] {
        let digest = hash(format!("global:{name}").as_bytes()).to_bytes();
        let mut out = [0u8; 8];
        out.copy_from_slice(&digest[..8]);
        out
    }

    #[test]
    fn discriminators_match_anchor_sighash() {
        assert_eq!(Initialize::DISCRIMINATOR, sighash("initialize"));
        assert_eq!(CreatePoll::DISCRIMINATOR, sighash("create_poll"));
        assert_eq!(RegisterCandidate::DISCRIMINATOR, sighash("register_candidate"));
        assert_eq!(Vote::DISCRIMINATOR, sighash("vote"));
    }

    #[test]
    fn initialize_carries_no_arguments() {
        assert_eq!(Initialize {}.data(), Initialize::DISCRIMINATOR.to_vec());
    }

    #[test]
    fn create_poll_layout() {
        let data = CreatePoll {
            description: "D".to_string(),
            start: 5,
            end: 9,
        }
        .data();

        let mut expected = CreatePoll::DISCRIMINATOR.to_vec();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.push(b'D');
        expected.extend_from_slice(&5u64.to_le_bytes());
        expected.extend_from_slice(&9u64.to_le_bytes());
        assert_eq!(data, expected);
    }

    #[test]
    fn vote_layout() {
        let data = Vote { poll_id: 1, cid: 2 }.data();
        assert_eq!(&data[..8], Vote::DISCRIMINATOR);
        assert_eq!(&data[8..16], &1u64.to_le_bytes());
        assert_eq!(&data[16..], &2u64.to_le_bytes());
    }
}

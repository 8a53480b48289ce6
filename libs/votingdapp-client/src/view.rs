//! View models: program accounts normalized for display.

use solana_sdk::pubkey::Pubkey;
use votingdapp_interface::{Candidate, Poll, MS_PER_SECOND};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    pub address: Pubkey,
    pub id: u64,
    pub description: String,
    /// Start of the voting window, unix milliseconds.
    pub start_ms: u64,
    /// End of the voting window, unix milliseconds.
    pub end_ms: u64,
    pub candidates: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Upcoming,
    Open,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateView {
    pub address: Pubkey,
    pub cid: u64,
    pub poll_id: u64,
    pub name: String,
    pub votes: u64,
}

/// A poll and its candidates as read by one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDetail {
    pub poll: PollView,
    pub candidates: Vec<CandidateView>,
}

impl PollView {
    pub fn from_account(address: Pubkey, poll: Poll) -> Self {
        Self {
            address,
            id: poll.id,
            description: poll.description,
            start_ms: poll.start.saturating_mul(MS_PER_SECOND),
            end_ms: poll.end.saturating_mul(MS_PER_SECOND),
            candidates: poll.candidates,
        }
    }

    pub fn status(&self, now_ms: u64) -> PollStatus {
        if now_ms < self.start_ms {
            PollStatus::Upcoming
        } else if now_ms < self.end_ms {
            PollStatus::Open
        } else {
            PollStatus::Ended
        }
    }
}

impl CandidateView {
    pub fn from_account(address: Pubkey, candidate: Candidate) -> Self {
        Self {
            address,
            cid: candidate.cid,
            poll_id: candidate.poll_id,
            name: candidate.name,
            votes: candidate.votes,
        }
    }
}

impl PollDetail {
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.votes).sum()
    }

    /// Candidate with the most votes; the earliest registered wins a tie.
    pub fn leader(&self) -> Option<&CandidateView> {
        self.candidates
            .iter()
            .filter(|c| c.votes > 0)
            .fold(None, |best: Option<&CandidateView>, c| match best {
                Some(b) if b.votes > c.votes || (b.votes == c.votes && b.cid < c.cid) => Some(b),
                _ => Some(c),
            })
    }
}

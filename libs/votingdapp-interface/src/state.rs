use anchor_lang::prelude::*;

// Account layouts owned by the votingdapp program.
// Field order is the Borsh wire order and must not change.

// Singleton holding the last assigned poll id
// The next poll is created at id `count + 1`
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
}

// Singleton holding the last assigned candidate id (shared by all polls)
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Registrations {
    pub count: u64,
}

// A poll, stored at PDA [id]
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Poll {
    // Sequence id taken from the Counter
    pub id: u64,

    // What the poll is about
    pub description: String,

    // Voting window, unix seconds
    pub start: u64,
    pub end: u64,

    // Number of registered candidates
    pub candidates: u64,
}

// A candidate, stored at PDA [poll_id, cid]
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Candidate {
    // Sequence id taken from Registrations
    pub cid: u64,

    // Poll this candidate runs in
    pub poll_id: u64,

    pub name: String,

    // Votes received so far
    pub votes: u64,
}

// Vote receipt, stored at PDA ["voter", poll_id, voter.key()]
// Its existence prevents a second vote by the same key in the same poll
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Voter {
    pub has_voted: bool,
}

impl Candidate {
    pub fn belongs_to(&self, poll_id: u64) -> bool {
        self.poll_id == poll_id
    }
}

// PDA Seeds for deterministic address generation
// These must match the deployed program byte for byte

// Seed for the Counter singleton: ["counter"]
pub const COUNTER_SEED: &[u8] = b"counter";

// Seed for the Registrations singleton: ["registration"]
pub const REGISTRATION_SEED: &[u8] = b"registration";

// Prefix for Voter PDAs: ["voter", poll_id, voter.key()]
// One voter account per voter per poll
pub const VOTER_SEED: &[u8] = b"voter";

// Poll PDAs use the bare poll id: [poll_id]
// Candidate PDAs use [poll_id, candidate_id]
// Both ids are encoded as 8-byte little endian

// Anchor discriminator size (8 bytes)
pub const DISCRIMINATOR_SIZE: usize = 8;

// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// Minimum wallet balance to initialize (0.01 SOL covers both singletons plus fees)
pub const MIN_INITIALIZE_LAMPORTS: u64 = 10_000_000;

// Polls store seconds, views use milliseconds
pub const MS_PER_SECOND: u64 = 1_000;

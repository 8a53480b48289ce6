use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::InstructionData;

// Typed interface of the deployed votingdapp program
pub mod accounts;
pub mod constants;
pub mod instruction;
pub mod pda;
pub mod state;

pub use constants::*;
pub use pda::*;
pub use state::*;

// Devnet and testnet deployment
declare_id!("6z68wfurCMYkZG51s1Et9BJEd9nJGUusjHXNt4dGbNNF");

/// Assembles a program instruction from its account list and argument payload.
pub fn build_instruction<A, D>(program_id: &Pubkey, accounts: &A, args: &D) -> Instruction
where
    A: ToAccountMetas,
    D: InstructionData,
{
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: args.data(),
    }
}

//! Account lists of the votingdapp instructions, in the order the program
//! declares them. The `user` account is always the signing fee payer.

use anchor_lang::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Initialize {
    pub user: Pubkey,
    pub counter: Pubkey,
    pub registration: Pubkey,
    pub system_program: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePoll {
    pub user: Pubkey,
    pub counter: Pubkey,
    pub poll: Pubkey,
    pub system_program: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterCandidate {
    pub user: Pubkey,
    pub poll: Pubkey,
    pub registration: Pubkey,
    pub candidate: Pubkey,
    pub system_program: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub user: Pubkey,
    pub poll: Pubkey,
    pub candidate: Pubkey,
    pub voter: Pubkey,
    pub system_program: Pubkey,
}

impl ToAccountMetas for Initialize {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.counter, false),
            AccountMeta::new(self.registration, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

impl ToAccountMetas for CreatePoll {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.counter, false),
            AccountMeta::new(self.poll, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

impl ToAccountMetas for RegisterCandidate {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.poll, false),
            AccountMeta::new(self.registration, false),
            AccountMeta::new(self.candidate, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

impl ToAccountMetas for Vote {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.poll, false),
            AccountMeta::new(self.candidate, false),
            AccountMeta::new(self.voter, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

//! Instruction builders over the program's generated client types.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::{system_program, InstructionData, ToAccountMetas};
use token_lock::state::Permission;

/// Arguments of `initialize` in wire form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializeArgs {
    pub recipient: Pubkey,
    pub cancel_permission: Permission,
    pub change_recipient_permission: Permission,
    /// Seconds from the cluster clock at execution.
    pub lock_duration: u64,
}

pub fn initialize(
    program_id: &Pubkey,
    vault: Pubkey,
    authority: Pubkey,
    args: &InitializeArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: token_lock::accounts::Initialize {
            vault,
            authority,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: token_lock::instruction::Initialize {
            recipient: args.recipient,
            cancel_permission: args.cancel_permission.code(),
            change_recipient_permission: args.change_recipient_permission.code(),
            lock_duration: args.lock_duration,
        }
        .data(),
    }
}

pub fn deposit(program_id: &Pubkey, vault: Pubkey, depositor: Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: token_lock::accounts::Deposit {
            vault,
            depositor,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: token_lock::instruction::Deposit { amount }.data(),
    }
}

pub fn unlock(program_id: &Pubkey, vault: Pubkey, recipient: Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: token_lock::accounts::Unlock { vault, recipient }.to_account_metas(None),
        data: token_lock::instruction::Unlock {}.data(),
    }
}

pub fn cancel(
    program_id: &Pubkey,
    vault: Pubkey,
    canceller: Pubkey,
    authority: Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: token_lock::accounts::Cancel {
            vault,
            canceller,
            authority,
        }
        .to_account_metas(None),
        data: token_lock::instruction::Cancel {}.data(),
    }
}

#![allow(unexpected_cfgs)]

//! # Token Lock
//!
//! One native SOL vault per authority, released to a recipient after
//! `lock_until` and cancellable by the roles named in its permission code.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

pub use instructions::*;

declare_id!("FkhA4QeypMGaFqb3YPE4ChoqDcaMVrM2mD9qjHaHUVtq");

#[program]
pub mod token_lock {
    use super::*;

    /// Create the caller's vault with its recipient, permissions and lock duration.
    pub fn initialize(
        ctx: Context<Initialize>,
        recipient: Pubkey,
        cancel_permission: u8,
        change_recipient_permission: u8,
        lock_duration: u64,
    ) -> Result<()> {
        instructions::initialize::initialize(
            ctx,
            recipient,
            cancel_permission,
            change_recipient_permission,
            lock_duration,
        )
    }

    /// Move lamports from the authority into its vault.
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::deposit(ctx, amount)
    }

    /// Recipient claims everything once `lock_until` has passed.
    pub fn unlock(ctx: Context<Unlock>) -> Result<()> {
        instructions::unlock::unlock(ctx)
    }

    /// Permitted role closes the vault, refunding the authority.
    pub fn cancel(ctx: Context<Cancel>) -> Result<()> {
        instructions::cancel::cancel(ctx)
    }
}

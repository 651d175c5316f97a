use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::TokenLockError;
use crate::state::Vault;

pub fn unlock(ctx: Context<Unlock>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    let now = Clock::get()?.unix_timestamp;
    require!(vault.is_unlockable(now), TokenLockError::LockNotExpired);

    let amount = vault.to_account_info().lamports();

    emit!(VaultUnlocked {
        vault: vault.key(),
        recipient: vault.recipient,
        amount,
    });

    // Lamport transfer and account close happen in the `close` constraint.
    msg!("[token-lock] unlock recipient={} amount={}", vault.recipient, amount);
    Ok(())
}

#[derive(Accounts)]
pub struct Unlock<'info> {
    #[account(
        mut,
        seeds = [VAULT_SEED, vault.authority.as_ref()],
        bump = vault.bump,
        has_one = recipient @ TokenLockError::Unauthorized,
        close = recipient,
    )]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub recipient: Signer<'info>,
}

#[event]
pub struct VaultUnlocked {
    pub vault: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
}

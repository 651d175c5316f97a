use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::TokenLockError;
use crate::state::{Permission, Vault};

pub fn initialize(
    ctx: Context<Initialize>,
    recipient: Pubkey,
    cancel_permission: u8,
    change_recipient_permission: u8,
    lock_duration: u64,
) -> Result<()> {
    require!(lock_duration > 0, TokenLockError::InvalidLockDuration);
    require!(recipient != Pubkey::default(), TokenLockError::InvalidRecipient);
    Permission::try_from(cancel_permission)?;
    Permission::try_from(change_recipient_permission)?;

    let now = Clock::get()?.unix_timestamp;
    let duration = i64::try_from(lock_duration).map_err(|_| TokenLockError::MathOverflow)?;
    let lock_until = now
        .checked_add(duration)
        .ok_or(TokenLockError::MathOverflow)?;

    let vault = &mut ctx.accounts.vault;
    vault.authority = ctx.accounts.authority.key();
    vault.recipient = recipient;
    vault.cancel_permission = cancel_permission;
    vault.change_recipient_permission = change_recipient_permission;
    vault.lock_until = lock_until;
    vault.bump = ctx.bumps.vault;

    emit!(VaultInitialized {
        authority: vault.authority,
        recipient,
        cancel_permission,
        change_recipient_permission,
        lock_until,
    });

    msg!(
        "[token-lock] initialized authority={} recipient={} lock_until={}",
        vault.authority,
        recipient,
        lock_until
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = Vault::space(),
        seeds = [VAULT_SEED, authority.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct VaultInitialized {
    pub authority: Pubkey,
    pub recipient: Pubkey,
    pub cancel_permission: u8,
    pub change_recipient_permission: u8,
    pub lock_until: i64,
}

use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::TokenLockError;
use crate::state::Vault;

pub fn cancel(ctx: Context<Cancel>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    let canceller = ctx.accounts.canceller.key();
    require!(vault.can_cancel(&canceller), TokenLockError::CancelNotPermitted);

    let amount = vault.to_account_info().lamports();

    emit!(VaultCancelled {
        vault: vault.key(),
        canceller,
        refunded_to: vault.authority,
        amount,
    });

    msg!(
        "[token-lock] cancel canceller={} refund={} amount={}",
        canceller,
        vault.authority,
        amount
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Cancel<'info> {
    #[account(
        mut,
        seeds = [VAULT_SEED, authority.key().as_ref()],
        bump = vault.bump,
        has_one = authority @ TokenLockError::Unauthorized,
        close = authority,
    )]
    pub vault: Account<'info, Vault>,

    pub canceller: Signer<'info>,

    /// CHECK: refund destination, pinned to the stored authority by `has_one`.
    #[account(mut)]
    pub authority: UncheckedAccount<'info>,
}

#[event]
pub struct VaultCancelled {
    pub vault: Pubkey,
    pub canceller: Pubkey,
    pub refunded_to: Pubkey,
    pub amount: u64,
}

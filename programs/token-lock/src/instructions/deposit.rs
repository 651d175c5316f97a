use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::VAULT_SEED;
use crate::error::TokenLockError;
use crate::state::Vault;

pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, TokenLockError::ZeroAmount);

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let vault_balance = ctx.accounts.vault.to_account_info().lamports();

    emit!(VaultDeposited {
        vault: ctx.accounts.vault.key(),
        depositor: ctx.accounts.depositor.key(),
        amount,
        vault_balance,
    });

    msg!("[token-lock] deposit amount={} vault_balance={}", amount, vault_balance);
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    // Seeded by the signer: only the authority can fund its own vault.
    #[account(
        mut,
        seeds = [VAULT_SEED, depositor.key().as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub depositor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct VaultDeposited {
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
}

//! Vault address derivation; must match the program's `seeds` constraint.

use anchor_lang::prelude::Pubkey;
use token_lock::constants::VAULT_SEED;

use crate::error::{ClientError, Result};

/// `[b"vault", authority]` under `program_id`, with the canonical bump.
pub fn find_vault_address(authority: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(&[VAULT_SEED, authority.as_ref()], program_id)
        .ok_or(ClientError::DerivationExhausted)
}

//! Fetch and decode vault accounts.

use anchor_lang::prelude::{AccountDeserialize, Pubkey, Rent};
use anchor_lang::error::ErrorCode;
use token_lock::state::{Permission, Vault};

use crate::error::{ClientError, Result};
use crate::provider::{AccountSnapshot, Provider};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Read model handed to collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultView {
    pub address: Pubkey,
    /// Raw account balance, rent reserve included.
    pub lamports: u64,
    /// Locked funds: lamports above the rent-exempt reserve.
    pub balance_lamports: u64,
    pub authority: Pubkey,
    pub recipient: Pubkey,
    pub cancel_permission: u8,
    pub change_recipient_permission: u8,
    pub lock_until: i64,
}

impl VaultView {
    pub fn cancel_permission(&self) -> Permission {
        // Codes are range-checked in `decode`.
        Permission::try_from(self.cancel_permission).unwrap_or(Permission::None)
    }

    pub fn change_recipient_permission(&self) -> Permission {
        Permission::try_from(self.change_recipient_permission).unwrap_or(Permission::None)
    }

    pub fn can_cancel(&self, caller: &Pubkey) -> bool {
        self.cancel_permission()
            .allows(caller, &self.authority, &self.recipient)
    }

    pub fn can_change_recipient(&self, caller: &Pubkey) -> bool {
        self.change_recipient_permission()
            .allows(caller, &self.authority, &self.recipient)
    }

    /// Advisory; the program re-checks against its own clock.
    pub fn is_unlockable(&self, now: i64) -> bool {
        now >= self.lock_until
    }

    /// Locked funds in SOL with all nine decimals, e.g. `2.500000000`.
    pub fn balance_sol(&self) -> String {
        format!(
            "{}.{:09}",
            self.balance_lamports / LAMPORTS_PER_SOL,
            self.balance_lamports % LAMPORTS_PER_SOL
        )
    }
}

pub fn fetch<P: Provider + ?Sized>(
    provider: &P,
    program_id: &Pubkey,
    address: &Pubkey,
) -> Result<Option<VaultView>> {
    match provider.get_account(address)? {
        // A closed account may linger with zero lamports until it is purged.
        Some(snapshot) if snapshot.lamports > 0 => decode(program_id, address, &snapshot).map(Some),
        _ => Ok(None),
    }
}

/// Schema-tagged decode: owner, discriminator, body, then permission range.
pub fn decode(program_id: &Pubkey, address: &Pubkey, snapshot: &AccountSnapshot) -> Result<VaultView> {
    let decode_err = |source: anchor_lang::error::Error| ClientError::Decode {
        address: *address,
        source,
    };

    if snapshot.owner != *program_id {
        return Err(decode_err(ErrorCode::AccountOwnedByWrongProgram.into()));
    }
    let vault = Vault::try_deserialize(&mut snapshot.data.as_slice()).map_err(decode_err)?;
    for code in [vault.cancel_permission, vault.change_recipient_permission] {
        Permission::try_from(code).map_err(|e| decode_err(e.into()))?;
    }

    let reserve = Rent::default().minimum_balance(snapshot.data.len());
    Ok(VaultView {
        address: *address,
        lamports: snapshot.lamports,
        balance_lamports: snapshot.lamports.saturating_sub(reserve),
        authority: vault.authority,
        recipient: vault.recipient,
        cancel_permission: vault.cancel_permission,
        change_recipient_permission: vault.change_recipient_permission,
        lock_until: vault.lock_until,
    })
}

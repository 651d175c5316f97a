use anchor_lang::prelude::*;

use crate::state::Permission;

/// Per-authority lock account (PDA, seeds = [b"vault", authority]).
///
/// The account's lamports above the rent reserve are the locked funds; the
/// record itself only carries the release rules.
#[account]
pub struct Vault {
    /// Creator and funder; fixed at initialization.
    pub authority: Pubkey,
    /// Receives every lamport on unlock.
    pub recipient: Pubkey,
    /// `Permission` code for `cancel`.
    pub cancel_permission: u8,
    /// `Permission` code for reassigning `recipient`.
    pub change_recipient_permission: u8,
    /// Release time (Unix seconds); fixed at initialization.
    pub lock_until: i64,
    /// Canonical bump of the vault PDA.
    pub bump: u8,
}

impl Vault {
    pub const SIZE: usize =
        32 + // authority
        32 + // recipient
        1 +  // cancel_permission
        1 +  // change_recipient_permission
        8 +  // lock_until
        1;   // bump

    /// Space including the account discriminator.
    pub const fn space() -> usize {
        8 + Self::SIZE
    }

    pub fn can_cancel(&self, caller: &Pubkey) -> bool {
        Permission::try_from(self.cancel_permission)
            .map(|p| p.allows(caller, &self.authority, &self.recipient))
            .unwrap_or(false)
    }

    pub fn can_change_recipient(&self, caller: &Pubkey) -> bool {
        Permission::try_from(self.change_recipient_permission)
            .map(|p| p.allows(caller, &self.authority, &self.recipient))
            .unwrap_or(false)
    }

    pub fn is_unlockable(&self, now: i64) -> bool {
        now >= self.lock_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(cancel: Permission) -> Vault {
        Vault {
            authority: Pubkey::new_from_array([1; 32]),
            recipient: Pubkey::new_from_array([2; 32]),
            cancel_permission: cancel.code(),
            change_recipient_permission: Permission::None.code(),
            lock_until: 1_000,
            bump: 255,
        }
    }

    #[test]
    fn size_matches_borsh_body() {
        let v = vault(Permission::Both);
        let mut body = Vec::new();
        AnchorSerialize::serialize(&v, &mut body).unwrap();
        assert_eq!(body.len(), Vault::SIZE);
        assert_eq!(Vault::space(), 83);
    }

    #[test]
    fn serialized_account_starts_with_discriminator() {
        let v = vault(Permission::Creator);
        let mut data = Vec::new();
        v.try_serialize(&mut data).unwrap();
        assert_eq!(&data[..8], Vault::DISCRIMINATOR);
        assert_eq!(data.len(), Vault::space());

        let back = Vault::try_deserialize(&mut data.as_slice()).unwrap();
        assert_eq!(back.authority, v.authority);
        assert_eq!(back.lock_until, 1_000);
    }

    #[test]
    fn unknown_permission_code_denies_everyone() {
        let mut v = vault(Permission::Both);
        v.cancel_permission = 9;
        assert!(!v.can_cancel(&v.authority.clone()));
        assert!(!v.can_cancel(&v.recipient.clone()));
    }

    #[test]
    fn unlock_is_inclusive_at_lock_until() {
        let v = vault(Permission::None);
        assert!(!v.is_unlockable(999));
        assert!(v.is_unlockable(1_000));
        assert!(v.is_unlockable(1_001));
    }
}

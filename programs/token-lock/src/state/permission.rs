use anchor_lang::prelude::*;

use crate::error::TokenLockError;

/// Who may perform a privileged action before release.
///
/// The discriminants are the wire codes stored in `Vault` and passed to
/// `initialize`; their order is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Permission {
    None = 0,
    Recipient = 1,
    Creator = 2,
    Both = 3,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::None,
        Permission::Recipient,
        Permission::Creator,
        Permission::Both,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Permission::None => "None",
            Permission::Recipient => "Recipient",
            Permission::Creator => "Creator",
            Permission::Both => "Both",
        }
    }

    /// Permission table: `caller` against the vault's two roles.
    pub fn allows(self, caller: &Pubkey, authority: &Pubkey, recipient: &Pubkey) -> bool {
        match self {
            Permission::None => false,
            Permission::Recipient => caller == recipient,
            Permission::Creator => caller == authority,
            Permission::Both => caller == authority || caller == recipient,
        }
    }
}

impl TryFrom<u8> for Permission {
    type Error = TokenLockError;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Permission::None),
            1 => Ok(Permission::Recipient),
            2 => Ok(Permission::Creator),
            3 => Ok(Permission::Both),
            _ => Err(TokenLockError::InvalidPermission),
        }
    }
}

impl From<Permission> for u8 {
    fn from(p: Permission) -> u8 {
        p.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> (Pubkey, Pubkey, Pubkey) {
        (
            Pubkey::new_from_array([1; 32]),
            Pubkey::new_from_array([2; 32]),
            Pubkey::new_from_array([3; 32]),
        )
    }

    #[test]
    fn truth_table() {
        let (owner, recipient, stranger) = keys();
        let check = |p: Permission, who: &Pubkey| p.allows(who, &owner, &recipient);

        assert!(!check(Permission::None, &owner));
        assert!(!check(Permission::None, &recipient));

        assert!(!check(Permission::Recipient, &owner));
        assert!(check(Permission::Recipient, &recipient));

        assert!(check(Permission::Creator, &owner));
        assert!(!check(Permission::Creator, &recipient));

        assert!(check(Permission::Both, &owner));
        assert!(check(Permission::Both, &recipient));

        for p in Permission::ALL {
            assert!(!check(p, &stranger));
        }
    }

    #[test]
    fn wire_codes_are_fixed() {
        assert_eq!(Permission::None.code(), 0);
        assert_eq!(Permission::Recipient.code(), 1);
        assert_eq!(Permission::Creator.code(), 2);
        assert_eq!(Permission::Both.code(), 3);
        for p in Permission::ALL {
            assert_eq!(Permission::try_from(p.code()).unwrap(), p);
        }
        assert!(Permission::try_from(4).is_err());
    }

    #[test]
    fn owner_who_is_also_recipient() {
        let (owner, _, _) = keys();
        assert!(Permission::Recipient.allows(&owner, &owner, &owner));
    }
}

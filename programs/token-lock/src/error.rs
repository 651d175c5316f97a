use anchor_lang::prelude::*;

/// Custom error codes for the token lock program.
#[error_code]
pub enum TokenLockError {
    #[msg("Lock duration must be greater than zero")]
    InvalidLockDuration,

    #[msg("Invalid permission code (expected 0-3)")]
    InvalidPermission,

    #[msg("Invalid recipient public key")]
    InvalidRecipient,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Vault is still locked")]
    LockNotExpired,

    #[msg("Unauthorized signer")]
    Unauthorized,

    #[msg("Signer is not permitted to cancel this vault")]
    CancelNotPermitted,

    #[msg("Math overflow")]
    MathOverflow,
}

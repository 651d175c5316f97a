use anchor_lang::prelude::Pubkey;
use thiserror::Error;
use token_lock::error::TokenLockError;

use crate::provider::{ProviderError, TxSignature};
use crate::reader::VaultView;

/// Local input rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Amount is zero (or rounds to zero lamports).
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    /// Amount text is not a decimal SOL value.
    #[error("invalid SOL amount: {0:?}")]
    InvalidAmount(String),
    /// Recipient text is not a base-58 public key, or is the default key.
    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),
    /// Lock duration is zero; the release time must be in the future.
    #[error("lock duration must be greater than zero")]
    InvalidLockDuration,
    #[error("invalid release time: {0:?}")]
    InvalidReleaseTime(String),
    #[error("invalid permission code {0} (expected 0-3)")]
    InvalidPermissionCode(u8),
    #[error("lock title is required")]
    EmptyTitle,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// No vault at the derived address.
    #[error("no vault at {0}")]
    VaultNotFound(Pubkey),
    /// Account exists but does not decode as a `Vault`.
    #[error("account {address} is not a vault: {source}")]
    Decode {
        address: Pubkey,
        #[source]
        source: anchor_lang::error::Error,
    },
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("vault is still locked: {0}")]
    PrematureUnlock(String),
    /// Connectivity failure; safe to retry.
    #[error("transport error: {0}")]
    Transport(String),
    /// Any other rejection by the program or runtime, message verbatim.
    #[error("rejected{}: {message}", code_suffix(.code))]
    RemoteRejection { code: Option<u32>, message: String },
    /// Sent but confirmation timed out and a re-fetch could not settle it.
    #[error("transaction {signature} was sent but not confirmed")]
    OutcomeUnknown {
        signature: TxSignature,
        observed: Option<Box<VaultView>>,
    },
    #[error("no valid vault address for any bump seed")]
    DerivationExhausted,
    #[error("configuration error: {0}")]
    Config(String),
}

fn code_suffix(code: &Option<u32>) -> String {
    code.map(|c| format!(" by program (code {c})")).unwrap_or_default()
}

impl ClientError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::OutcomeUnknown { .. }
        )
    }
}

/// Classify a provider failure into the client taxonomy using the program's
/// error codes.
impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Transport(msg) => ClientError::Transport(msg),
            ProviderError::Unconfirmed(signature) => ClientError::OutcomeUnknown {
                signature,
                observed: None,
            },
            ProviderError::Rejected { code, message } => match code {
                Some(c)
                    if c == u32::from(TokenLockError::Unauthorized)
                        || c == u32::from(TokenLockError::CancelNotPermitted) =>
                {
                    ClientError::PermissionDenied(message)
                }
                Some(c) if c == u32::from(TokenLockError::LockNotExpired) => {
                    ClientError::PrematureUnlock(message)
                }
                _ => ClientError::RemoteRejection { code, message },
            },
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

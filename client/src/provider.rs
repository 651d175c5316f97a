//! The seam between the protocol and an RPC connection plus wallet.

use std::fmt;

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use thiserror::Error;

/// Base-58 transaction signature as returned by the cluster.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxSignature(pub String);

impl TxSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxSignature {
    fn from(s: &str) -> Self {
        TxSignature(s.to_string())
    }
}

impl From<String> for TxSignature {
    fn from(s: String) -> Self {
        TxSignature(s)
    }
}

/// Raw account as read from the cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub lamports: u64,
    /// Owning program.
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Could not reach the cluster, or the request failed in flight.
    #[error("transport: {0}")]
    Transport(String),
    /// Sent, but confirmation did not arrive in time.
    #[error("transaction {0} not confirmed")]
    Unconfirmed(TxSignature),
    /// Simulation or execution failed. `code` is the custom program error
    /// code when there is one.
    #[error("rejected: {message}")]
    Rejected { code: Option<u32>, message: String },
}

/// RPC connection plus the wallet that signs for the caller.
///
/// Every call blocks until the cluster answers; that is the only suspension
/// point in an operation.
pub trait Provider {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ProviderError>;

    /// Sign with `signer` (also the fee payer), send, and wait for
    /// confirmation.
    fn send_and_confirm(
        &mut self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<TxSignature, ProviderError>;

    /// Cluster clock, Unix seconds.
    fn unix_timestamp(&self) -> Result<i64, ProviderError>;
}

impl<P: Provider + ?Sized> Provider for &mut P {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ProviderError> {
        (**self).get_account(address)
    }

    fn send_and_confirm(
        &mut self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<TxSignature, ProviderError> {
        (**self).send_and_confirm(instruction, signer)
    }

    fn unix_timestamp(&self) -> Result<i64, ProviderError> {
        (**self).unix_timestamp()
    }
}

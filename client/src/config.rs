use std::str::FromStr;

use anchor_lang::prelude::Pubkey;

use crate::error::{ClientError, Result};

/// Environment variable overriding the deployed program id.
pub const PROGRAM_ID_ENV: &str = "TOKEN_LOCK_PROGRAM_ID";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub program_id: Pubkey,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: token_lock::ID,
        }
    }
}

impl ClientConfig {
    pub fn with_program_id(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Reads `TOKEN_LOCK_PROGRAM_ID`; falls back to the built-in id when unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup(PROGRAM_ID_ENV) {
            Some(raw) if !raw.trim().is_empty() => {
                let program_id = Pubkey::from_str(raw.trim()).map_err(|e| {
                    ClientError::Config(format!("{PROGRAM_ID_ENV}={raw:?} is not a public key: {e}"))
                })?;
                Ok(Self::with_program_id(program_id))
            }
            _ => Ok(Self::default()),
        }
    }
}

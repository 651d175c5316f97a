//! # Token Lock client
//!
//! Client-side protocol for the `token_lock` program: derive the per-owner
//! vault address, read and decode vault state, map form input to wire
//! arguments, and drive the initialize / deposit / unlock / cancel lifecycle
//! through a [`Provider`].
//!
//! With the default `program-test` feature, [`bank::BankProvider`] runs the
//! program in-process.

pub mod address;
#[cfg(feature = "program-test")]
pub mod bank;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod instructions;
pub mod provider;
pub mod reader;
pub mod utils;

pub use address::find_vault_address;
pub use client::{Initialization, LockReceipt, Receipt, VaultClient};
pub use config::ClientConfig;
pub use error::{ClientError, ValidationError};
pub use form::{LockForm, LockRequest};
pub use instructions::InitializeArgs;
pub use provider::{AccountSnapshot, Provider, ProviderError, TxSignature};
pub use reader::{VaultView, LAMPORTS_PER_SOL};
pub use token_lock::state::Permission;

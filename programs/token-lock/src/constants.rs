//! Program-wide constants.

/// Seed prefix for the per-authority vault PDA: `[VAULT_SEED, authority]`.
pub const VAULT_SEED: &[u8] = b"vault";

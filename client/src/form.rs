//! Maps what a user typed into protocol-typed lock arguments.

use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use token_lock::state::Permission;

use crate::error::ValidationError;
use crate::instructions::InitializeArgs;
use crate::reader::LAMPORTS_PER_SOL;
use crate::utils::time;

const SOL_DECIMALS: usize = 9;

/// Raw lock form input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockForm {
    pub title: String,
    /// Decimal SOL, e.g. `"2.5"`.
    pub amount: String,
    pub recipient_address: String,
    pub cancel_permission: Permission,
    pub change_recipient_permission: Permission,
    /// `YYYY-MM-DDTHH:MM[:SS]` (UTC) or Unix seconds.
    pub release_time: String,
}

/// Validated lock, ready for `VaultClient::create_lock`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockRequest {
    pub recipient: Pubkey,
    pub cancel_permission: Permission,
    pub change_recipient_permission: Permission,
    pub lock_duration: u64,
    pub amount_lamports: u64,
}

impl LockRequest {
    pub fn initialize_args(&self) -> InitializeArgs {
        InitializeArgs {
            recipient: self.recipient,
            cancel_permission: self.cancel_permission,
            change_recipient_permission: self.change_recipient_permission,
            lock_duration: self.lock_duration,
        }
    }
}

impl LockForm {
    /// Validate against `now` (Unix seconds).
    pub fn to_request(&self, now: i64) -> Result<LockRequest, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let amount_lamports = parse_sol_amount(&self.amount)?;
        let recipient = parse_recipient(&self.recipient_address)?;
        let release = time::parse_release_time(&self.release_time)?;
        let lock_duration = lock_duration_until(release, now);
        if lock_duration == 0 {
            return Err(ValidationError::InvalidLockDuration);
        }
        Ok(LockRequest {
            recipient,
            cancel_permission: self.cancel_permission,
            change_recipient_permission: self.change_recipient_permission,
            lock_duration,
            amount_lamports,
        })
    }
}

pub fn permission_code(permission: Permission) -> u8 {
    permission.code()
}

pub fn permission_from_code(code: u8) -> Result<Permission, ValidationError> {
    Permission::try_from(code).map_err(|_| ValidationError::InvalidPermissionCode(code))
}

/// Seconds from `now` until `release`; a moment already past clamps to zero.
pub fn lock_duration_until(release: i64, now: i64) -> u64 {
    u64::try_from(release.saturating_sub(now)).unwrap_or(0)
}

/// Signed duration input, e.g. from a "lock for N seconds" field.
pub fn validate_lock_duration(seconds: i64) -> Result<u64, ValidationError> {
    match u64::try_from(seconds) {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(ValidationError::InvalidLockDuration),
    }
}

pub fn parse_recipient(input: &str) -> Result<Pubkey, ValidationError> {
    let key = Pubkey::from_str(input.trim())
        .map_err(|_| ValidationError::InvalidRecipient(input.to_string()))?;
    if key == Pubkey::default() {
        return Err(ValidationError::InvalidRecipient(input.to_string()));
    }
    Ok(key)
}

/// Exact decimal SOL to lamports; more than nine fractional digits is an
/// error rather than a rounding.
pub fn parse_sol_amount(input: &str) -> Result<u64, ValidationError> {
    let s = input.trim();
    let invalid = || ValidationError::InvalidAmount(input.to_string());
    if s.starts_with('-') {
        return Err(ValidationError::NonPositiveAmount);
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) || frac.len() > SOL_DECIMALS {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = SOL_DECIMALS);
        padded.parse().map_err(|_| invalid())?
    };

    let lamports = whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|l| l.checked_add(frac))
        .ok_or_else(invalid)?;
    if lamports == 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(lamports)
}

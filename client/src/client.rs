//! Guarded vault lifecycle: initialize-if-absent, deposit, unlock, cancel.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use log::{debug, info, warn};

use crate::address::find_vault_address;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result, ValidationError};
use crate::form::LockRequest;
use crate::instructions::{self, InitializeArgs};
use crate::provider::{Provider, ProviderError, TxSignature};
use crate::reader::{self, VaultView};

/// Result of `initialize_if_absent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Initialization {
    Created(TxSignature),
    /// Nothing was sent; the existing vault is returned unchanged.
    AlreadyExists(VaultView),
}

/// Outcome of `create_lock`.
#[derive(Debug)]
pub struct LockReceipt {
    /// `AlreadyExists` means the deposit went into a vault whose recipient,
    /// release time and permissions predate this request.
    pub initialization: Initialization,
    pub deposit: Receipt,
}

impl LockReceipt {
    pub fn already_existed(&self) -> bool {
        matches!(self.initialization, Initialization::AlreadyExists(_))
    }
}

/// A confirmed mutation plus the best-effort state read after it.
#[derive(Debug)]
pub struct Receipt {
    pub signature: TxSignature,
    /// `Ok(None)` means the vault reads as closed. A failed read does not
    /// undo `signature`.
    pub state: Result<Option<VaultView>>,
}

/// What a re-fetch must show for an unconfirmed send to count as landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landed {
    IfPresent,
    IfClosed,
    Never,
}

pub struct VaultClient<P: Provider> {
    provider: P,
    program_id: Pubkey,
}

impl<P: Provider> VaultClient<P> {
    pub fn new(provider: P, config: ClientConfig) -> Self {
        Self {
            provider,
            program_id: config.program_id,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    pub fn vault_address(&self, authority: &Pubkey) -> Result<Pubkey> {
        find_vault_address(authority, &self.program_id).map(|(address, _)| address)
    }

    /// Current vault of `authority`, or `None` if it has none.
    pub fn fetch_vault(&self, authority: &Pubkey) -> Result<Option<VaultView>> {
        let address = self.vault_address(authority)?;
        self.fetch_at(&address)
    }

    pub fn fetch_at(&self, address: &Pubkey) -> Result<Option<VaultView>> {
        reader::fetch(&self.provider, &self.program_id, address)
    }

    /// Create the vault unless one already exists at the derived address.
    ///
    /// Idempotence comes from the address being a function of `authority`
    /// alone plus the existence check; a racing second creator is rejected by
    /// the runtime because the account is already in use.
    pub fn initialize_if_absent(
        &mut self,
        authority: &Pubkey,
        args: &InitializeArgs,
    ) -> Result<Initialization> {
        if args.lock_duration == 0 {
            return Err(ValidationError::InvalidLockDuration.into());
        }
        if args.recipient == Pubkey::default() {
            return Err(ValidationError::InvalidRecipient(args.recipient.to_string()).into());
        }

        let address = self.vault_address(authority)?;
        if let Some(existing) = self.fetch_at(&address)? {
            info!("vault already initialized address={}", address);
            return Ok(Initialization::AlreadyExists(existing));
        }

        if let Ok(now) = self.provider.unix_timestamp() {
            let lock_until = now.saturating_add_unsigned(args.lock_duration);
            debug!(
                "vault not found, initializing address={} expected_lock_until={}",
                address, lock_until
            );
        }

        let ix = instructions::initialize(&self.program_id, address, *authority, args);
        let signature = self.submit(ix, authority, authority, Landed::IfPresent)?;
        info!("vault initialized signature={}", signature);
        Ok(Initialization::Created(signature))
    }

    /// Fund the authority's vault. Existence is not pre-checked; a missing
    /// vault comes back as a program rejection.
    pub fn deposit(&mut self, authority: &Pubkey, amount_lamports: u64) -> Result<TxSignature> {
        if amount_lamports == 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        let address = self.vault_address(authority)?;
        let ix = instructions::deposit(&self.program_id, address, *authority, amount_lamports);
        let signature = self.submit(ix, authority, authority, Landed::Never)?;
        info!("deposit amount={} signature={}", amount_lamports, signature);
        Ok(signature)
    }

    /// Claim as `recipient` from the vault of `authority`.
    ///
    /// Sent regardless of the local clock or a missing vault; the program's
    /// checks are authoritative. Use `VaultView::is_unlockable` to gate a UI.
    pub fn unlock(&mut self, authority: &Pubkey, recipient: &Pubkey) -> Result<TxSignature> {
        let address = self.vault_address(authority)?;
        // A vault that reads absent afterwards only proves the unlock if it
        // was there before.
        let landed = match self.fetch_at(&address)? {
            Some(_) => Landed::IfClosed,
            None => Landed::Never,
        };
        let ix = instructions::unlock(&self.program_id, address, *recipient);
        let signature = self.submit(ix, recipient, authority, landed)?;
        info!("unlock signature={}", signature);
        Ok(signature)
    }

    /// Cancel the vault of `authority` as `canceller`, refunding the authority.
    ///
    /// The permission table is checked locally first so a denied caller never
    /// pays for a round trip.
    pub fn cancel(&mut self, authority: &Pubkey, canceller: &Pubkey) -> Result<TxSignature> {
        let address = self.vault_address(authority)?;
        let vault = self
            .fetch_at(&address)?
            .ok_or(ClientError::VaultNotFound(address))?;
        if !vault.can_cancel(canceller) {
            warn!(
                "cancel denied locally canceller={} permission={}",
                canceller,
                vault.cancel_permission().label()
            );
            return Err(ClientError::PermissionDenied(format!(
                "{} may not cancel (permission: {})",
                canceller,
                vault.cancel_permission().label()
            )));
        }

        let ix = instructions::cancel(&self.program_id, address, *canceller, vault.authority);
        let signature = self.submit(ix, canceller, authority, Landed::IfClosed)?;
        info!("cancel signature={}", signature);
        Ok(signature)
    }

    /// Lock funds for a recipient: initialize-if-absent, deposit, refresh.
    pub fn create_lock(
        &mut self,
        authority: &Pubkey,
        request: &LockRequest,
    ) -> Result<LockReceipt> {
        if request.amount_lamports == 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        let initialization = self.initialize_if_absent(authority, &request.initialize_args())?;
        let signature = self.deposit(authority, request.amount_lamports)?;
        Ok(LockReceipt {
            initialization,
            deposit: self.refresh(authority, signature),
        })
    }

    /// Pair a confirmed signature with a fresh read of the vault.
    pub fn refresh(&self, authority: &Pubkey, signature: TxSignature) -> Receipt {
        let state = self.fetch_vault(authority);
        if let Err(err) = &state {
            warn!("refresh after {} failed: {}", signature, err);
        }
        Receipt { signature, state }
    }

    fn submit(
        &mut self,
        ix: Instruction,
        signer: &Pubkey,
        authority: &Pubkey,
        landed: Landed,
    ) -> Result<TxSignature> {
        match self.provider.send_and_confirm(ix, signer) {
            Ok(signature) => Ok(signature),
            Err(ProviderError::Unconfirmed(signature)) => {
                self.settle_unconfirmed(authority, signature, landed)
            }
            Err(err) => {
                let err = ClientError::from(err);
                warn!("submission failed: {}", err);
                Err(err)
            }
        }
    }

    /// A confirmation timeout is an unknown outcome: re-read the vault and
    /// accept only what proves the instruction landed.
    fn settle_unconfirmed(
        &self,
        authority: &Pubkey,
        signature: TxSignature,
        landed: Landed,
    ) -> Result<TxSignature> {
        warn!("confirmation timed out signature={}, re-fetching", signature);
        let observed = match self.fetch_vault(authority) {
            Ok(observed) => observed,
            Err(err) => {
                warn!("re-fetch failed: {}", err);
                return Err(ClientError::OutcomeUnknown {
                    signature,
                    observed: None,
                });
            }
        };
        let proven = match landed {
            Landed::IfPresent => observed.is_some(),
            Landed::IfClosed => observed.is_none(),
            Landed::Never => false,
        };
        if proven {
            Ok(signature)
        } else {
            Err(ClientError::OutcomeUnknown {
                signature,
                observed: observed.map(Box::new),
            })
        }
    }
}

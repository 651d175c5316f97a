//! [`Provider`] over an in-process bank running the `token_lock` program.
//!
//! The program's own entrypoint is registered as a builtin, so every
//! instruction goes through the real account constraints and handlers.
//! Wallets are keypairs held by the provider; fees are paid by the bank's
//! funded payer, so a wallet's balance moves only by what the program
//! transfers.

use std::collections::HashMap;

use anchor_lang::prelude::{AccountInfo, Pubkey};
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::solana_program::instruction::Instruction;
use log::debug;
use solana_program_test::{processor, BanksClient, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::account::{Account, AccountSharedData};
use solana_sdk::clock::Clock;
use solana_sdk::instruction::InstructionError;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};
use tokio::runtime::Runtime;

use crate::provider::{AccountSnapshot, Provider, ProviderError, TxSignature};

fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    // The generated entrypoint ties the slice and account lifetimes together.
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    token_lock::entry(program_id, accounts, data)
}

pub struct BankProvider {
    runtime: Runtime,
    context: ProgramTestContext,
    wallets: HashMap<Pubkey, Keypair>,
    slot: u64,
    unix_timestamp: i64,
}

impl BankProvider {
    /// Boot a bank with `token_lock` deployed at its declared id.
    pub fn start() -> Result<Self, ProviderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let mut program_test = ProgramTest::new(
            "token_lock",
            token_lock::ID,
            processor!(process_instruction),
        );
        program_test.prefer_bpf(false);
        let context = runtime.block_on(program_test.start_with_context());

        let clock: Clock = runtime
            .block_on(context.banks_client.clone().get_sysvar())
            .map_err(transport)?;
        debug!("bank started slot={} unix_timestamp={}", clock.slot, clock.unix_timestamp);

        Ok(Self {
            runtime,
            context,
            wallets: HashMap::new(),
            slot: clock.slot,
            unix_timestamp: clock.unix_timestamp,
        })
    }

    /// Create a system-owned wallet holding `lamports` and keep its keypair
    /// for signing.
    pub fn add_wallet(&mut self, lamports: u64) -> Pubkey {
        let keypair = Keypair::new();
        let address = keypair.pubkey();
        self.context.set_account(
            &address,
            &AccountSharedData::new(lamports, 0, &anchor_lang::system_program::ID),
        );
        self.wallets.insert(address, keypair);
        address
    }

    /// Sign for an externally created keypair.
    pub fn add_keypair(&mut self, keypair: Keypair) -> Pubkey {
        let address = keypair.pubkey();
        self.wallets.insert(address, keypair);
        address
    }

    pub fn lamports(&self, address: &Pubkey) -> Result<u64, ProviderError> {
        self.runtime
            .block_on(self.banks().get_balance(*address))
            .map_err(transport)
    }

    /// Overwrite an account, bypassing every program.
    pub fn set_account(&mut self, address: &Pubkey, snapshot: AccountSnapshot) {
        let account = Account {
            lamports: snapshot.lamports,
            data: snapshot.data,
            owner: snapshot.owner,
            executable: false,
            rent_epoch: 0,
        };
        self.context
            .set_account(address, &AccountSharedData::from(account));
    }

    pub fn set_unix_timestamp(&mut self, unix_timestamp: i64) -> Result<(), ProviderError> {
        self.unix_timestamp = unix_timestamp;
        self.sync_clock()
    }

    pub fn advance_clock(&mut self, seconds: i64) -> Result<(), ProviderError> {
        self.set_unix_timestamp(self.unix_timestamp + seconds)
    }

    fn banks(&self) -> BanksClient {
        self.context.banks_client.clone()
    }

    fn sync_clock(&mut self) -> Result<(), ProviderError> {
        let mut clock: Clock = self
            .runtime
            .block_on(self.banks().get_sysvar())
            .map_err(transport)?;
        clock.unix_timestamp = self.unix_timestamp;
        self.context.set_sysvar(&clock);
        Ok(())
    }

    /// Move to a fresh slot so a repeated instruction gets a new blockhash.
    /// Warping rewrites the clock, so the pinned timestamp is put back.
    fn next_slot(&mut self) -> Result<(), ProviderError> {
        self.slot += 1;
        self.context
            .warp_to_slot(self.slot)
            .map_err(|e| ProviderError::Transport(format!("{e:?}")))?;
        self.sync_clock()
    }
}

impl Provider for BankProvider {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ProviderError> {
        let account = self
            .runtime
            .block_on(self.banks().get_account(*address))
            .map_err(transport)?;
        Ok(account.map(|a| AccountSnapshot {
            lamports: a.lamports,
            owner: a.owner,
            data: a.data,
        }))
    }

    fn send_and_confirm(
        &mut self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<TxSignature, ProviderError> {
        self.next_slot()?;
        let blockhash = self
            .runtime
            .block_on(self.banks().get_latest_blockhash())
            .map_err(transport)?;

        let payer = &self.context.payer;
        let wallet = self.wallets.get(signer).ok_or_else(|| ProviderError::Rejected {
            code: None,
            message: format!("no keypair for signer {signer}"),
        })?;
        let signers: Vec<&Keypair> = if wallet.pubkey() == payer.pubkey() {
            vec![payer]
        } else {
            vec![payer, wallet]
        };
        let tx = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            &signers,
            blockhash,
        );
        let signature = TxSignature(tx.signatures[0].to_string());

        self.runtime
            .block_on(self.banks().process_transaction(tx))
            .map_err(rejection)?;
        debug!("processed signature={}", signature);
        Ok(signature)
    }

    fn unix_timestamp(&self) -> Result<i64, ProviderError> {
        let clock: Clock = self
            .runtime
            .block_on(self.banks().get_sysvar())
            .map_err(transport)?;
        Ok(clock.unix_timestamp)
    }
}

fn transport(err: BanksClientError) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

fn rejection(err: BanksClientError) -> ProviderError {
    let tx_err = match err {
        BanksClientError::TransactionError(e) => e,
        BanksClientError::SimulationError { err, .. } => err,
        other => return transport(other),
    };
    let code = match tx_err {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(code),
        _ => None,
    };
    ProviderError::Rejected {
        code,
        message: tx_err.to_string(),
    }
}

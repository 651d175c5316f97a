//! Test cluster: the in-process bank running `token_lock`, with injectable
//! transport faults.

#![allow(dead_code)]

use std::cell::Cell;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;
use std::thread::{self, ThreadId};

use anchor_lang::prelude::{Pubkey, Rent};
use anchor_lang::solana_program::instruction::Instruction;
use log::{Level, LevelFilter, Log, Metadata, Record};
use token_lock::state::Vault;
use token_lock_client::bank::BankProvider;
use token_lock_client::{AccountSnapshot, Provider, ProviderError, TxSignature};

pub const START: i64 = 1_775_865_600; // 2026-04-11T00:00 UTC
pub const SOL: u64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Next send fails in transport before reaching the bank.
    SendTransport,
    /// Next send executes but confirmation times out.
    Timeout,
    /// Next send is dropped and confirmation times out.
    DroppedTimeout,
}

pub struct TestCluster {
    bank: BankProvider,
    faults: Vec<Fault>,
    /// Reads left before `get_account` starts failing; `None` never fails.
    ok_reads: Cell<Option<u32>>,
    /// Transactions that reached the bank.
    pub sent: usize,
    pub last_signature: Option<TxSignature>,
}

impl TestCluster {
    pub fn start() -> Self {
        let mut bank = BankProvider::start().unwrap();
        bank.set_unix_timestamp(START).unwrap();
        Self {
            bank,
            faults: Vec::new(),
            ok_reads: Cell::new(None),
            sent: 0,
            last_signature: None,
        }
    }

    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn fail_reads_after(&self, n: u32) {
        self.ok_reads.set(Some(n));
    }

    pub fn advance(&mut self, seconds: i64) {
        self.bank.advance_clock(seconds).unwrap();
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.bank.lamports(address).unwrap()
    }

    pub fn vault_rent() -> u64 {
        Rent::default().minimum_balance(Vault::space())
    }

    fn take_fault(&mut self) -> Option<Fault> {
        if self.faults.is_empty() {
            None
        } else {
            Some(self.faults.remove(0))
        }
    }
}

impl Deref for TestCluster {
    type Target = BankProvider;

    fn deref(&self) -> &BankProvider {
        &self.bank
    }
}

impl DerefMut for TestCluster {
    fn deref_mut(&mut self) -> &mut BankProvider {
        &mut self.bank
    }
}

impl Provider for TestCluster {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ProviderError> {
        match self.ok_reads.get() {
            Some(0) => return Err(ProviderError::Transport("timed out reading account".into())),
            Some(n) => self.ok_reads.set(Some(n - 1)),
            None => {}
        }
        self.bank.get_account(address)
    }

    fn send_and_confirm(
        &mut self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<TxSignature, ProviderError> {
        match self.take_fault() {
            Some(Fault::SendTransport) => {
                Err(ProviderError::Transport("connection reset by peer".into()))
            }
            Some(Fault::DroppedTimeout) => {
                Err(ProviderError::Unconfirmed(TxSignature::from("dropped")))
            }
            Some(Fault::Timeout) => {
                self.sent += 1;
                let signature = self.bank.send_and_confirm(instruction, signer)?;
                Err(ProviderError::Unconfirmed(signature))
            }
            None => {
                self.sent += 1;
                let signature = self.bank.send_and_confirm(instruction, signer)?;
                self.last_signature = Some(signature.clone());
                Ok(signature)
            }
        }
    }

    fn unix_timestamp(&self) -> Result<i64, ProviderError> {
        self.bank.unix_timestamp()
    }
}

/// Fails the test on any network use.
pub struct Offline;

impl Provider for Offline {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ProviderError> {
        panic!("unexpected read of {address}")
    }

    fn send_and_confirm(
        &mut self,
        _instruction: Instruction,
        _signer: &Pubkey,
    ) -> Result<TxSignature, ProviderError> {
        panic!("unexpected send")
    }

    fn unix_timestamp(&self) -> Result<i64, ProviderError> {
        panic!("unexpected clock read")
    }
}

static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.lock().unwrap().push((
            thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;

/// Route `log` records into memory; tests run on separate threads, so each
/// sees only its own records.
pub fn capture_logs() {
    if log::set_logger(&CAPTURE).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

pub fn logged(level: Level) -> Vec<String> {
    let me = thread::current().id();
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, l, _)| *id == me && *l == level)
        .map(|(_, _, msg)| msg.clone())
        .collect()
}

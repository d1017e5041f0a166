//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, U256};
use alloy::signers::Signature;
use alloy::sol_types::{SolCall, SolValue};

use drips_sdk::chain::{ChainError, ChainResult, PendingTx, PreparedTx, ReadClient, TxReceipt, WriteClient};
use drips_sdk::claim::Clock;
use drips_sdk::codec::account_id::address_driver_account_id;
use drips_sdk::contracts::{AddressDriver, RepoDriver};
use drips_sdk::registry::{ChainContracts, ContractRegistry, MAINNET_CHAIN_ID};

pub const SIGNER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const UNWRAPPER: Address = address!("00000000000000000000000000000000000000aa");

/// Mainnet registry with a native token unwrapper configured.
pub fn registry_with_unwrapper() -> ContractRegistry {
    let mut registry = ContractRegistry::with_defaults();
    let mut contracts = mainnet_contracts();
    contracts.native_token_unwrapper = Some(UNWRAPPER);
    registry.insert(MAINNET_CHAIN_ID, contracts);
    registry
}

pub fn mainnet_contracts() -> ChainContracts {
    ContractRegistry::with_defaults()
        .contracts_for(MAINNET_CHAIN_ID)
        .unwrap()
        .clone()
}

/// Account ID the mock RepoDriver returns for `(forge, name)`.
pub fn repo_account_id(forge: u8, name: &[u8]) -> U256 {
    let hash = keccak256(name);
    (U256::from(3u8) << 224) | (U256::from(forge) << 216) | U256::from_be_slice(&hash[8..])
}

/// How the mock answers `RepoDriver.ownerOf`.
#[derive(Debug, Clone, Copy)]
pub enum OwnerBehavior {
    /// Return the signer from the `n`th read onward (1-based).
    OwnedAfter(u32),
    /// Fail the first `n` reads, then return the signer.
    FailingReads(u32),
    /// Never return the signer.
    Never,
}

/// Programmable in-memory chain implementing the chain capabilities.
///
/// Reads are answered by selector; sent transactions are recorded.
pub struct MockChain {
    pub chain_id: u64,
    pub signer: Address,
    pub owner: OwnerBehavior,
    /// Functions whose transactions revert once mined.
    pub reverting: HashSet<[u8; 4]>,
    /// Fail every read with an RPC error.
    pub reads_fail: bool,
    owner_reads: AtomicU32,
    reads: Mutex<Vec<PreparedTx>>,
    sent: Mutex<Vec<PreparedTx>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            chain_id: MAINNET_CHAIN_ID,
            signer: SIGNER,
            owner: OwnerBehavior::OwnedAfter(1),
            reverting: HashSet::new(),
            reads_fail: false,
            owner_reads: AtomicU32::new(0),
            reads: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_owner(mut self, owner: OwnerBehavior) -> Self {
        self.owner = owner;
        self
    }

    pub fn reverting<C: SolCall>(mut self) -> Self {
        self.reverting.insert(C::SELECTOR);
        self
    }

    pub fn with_failing_reads(mut self) -> Self {
        self.reads_fail = true;
        self
    }

    pub fn sent(&self) -> Vec<PreparedTx> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_functions(&self) -> Vec<String> {
        self.sent().into_iter().map(|tx| tx.abi_function_name).collect()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    pub fn owner_reads(&self) -> u32 {
        self.owner_reads.load(Ordering::SeqCst)
    }

    fn owner_of(&self) -> ChainResult<Bytes> {
        let read = self.owner_reads.fetch_add(1, Ordering::SeqCst) + 1;
        let owner = match self.owner {
            OwnerBehavior::OwnedAfter(n) if read >= n => self.signer,
            OwnerBehavior::FailingReads(n) if read <= n => {
                return Err(ChainError::Rpc("connection reset".into()));
            }
            OwnerBehavior::FailingReads(_) => self.signer,
            _ => Address::ZERO,
        };
        Ok(owner.abi_encode().into())
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadClient for MockChain {
    async fn call(&self, tx: &PreparedTx) -> ChainResult<Bytes> {
        self.reads.lock().unwrap().push(tx.clone());
        if self.reads_fail {
            return Err(ChainError::Rpc("endpoint unavailable".into()));
        }

        match tx.selector() {
            Some(AddressDriver::calcAccountIdCall::SELECTOR) => {
                let call = AddressDriver::calcAccountIdCall::abi_decode(&tx.data)
                    .map_err(|e| ChainError::Rpc(e.to_string()))?;
                Ok(address_driver_account_id(call.addr).abi_encode().into())
            }
            Some(RepoDriver::calcAccountIdCall::SELECTOR) => {
                let call = RepoDriver::calcAccountIdCall::abi_decode(&tx.data)
                    .map_err(|e| ChainError::Rpc(e.to_string()))?;
                Ok(repo_account_id(call.forge, &call.name).abi_encode().into())
            }
            Some(RepoDriver::ownerOfCall::SELECTOR) => self.owner_of(),
            _ => Err(ChainError::Rpc(format!("unexpected call to {}", tx.abi_function_name))),
        }
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        Ok(self.chain_id)
    }
}

/// A transaction accepted by [`MockChain`].
pub struct MockPending {
    hash: TxHash,
    reverts: bool,
}

impl PendingTx for MockPending {
    fn hash(&self) -> TxHash {
        self.hash
    }

    async fn wait(self, _confirmations: u64) -> ChainResult<TxReceipt> {
        if self.reverts {
            return Err(ChainError::Reverted(self.hash));
        }
        Ok(TxReceipt {
            tx_hash: self.hash,
            block_number: Some(1),
        })
    }
}

impl WriteClient for MockChain {
    type Pending = MockPending;

    async fn address(&self) -> ChainResult<Address> {
        Ok(self.signer)
    }

    async fn send_tx(&self, tx: PreparedTx) -> ChainResult<MockPending> {
        let mut sent = self.sent.lock().unwrap();
        let mut preimage = tx.data.to_vec();
        preimage.extend_from_slice(&(sent.len() as u64).to_be_bytes());

        let reverts = tx.selector().is_some_and(|s| self.reverting.contains(&s));
        sent.push(tx);
        Ok(MockPending {
            hash: keccak256(preimage),
            reverts,
        })
    }

    async fn sign_message(&self, _message: &[u8]) -> ChainResult<Signature> {
        Err(ChainError::Wallet("mock chain cannot sign".into()))
    }
}

/// Clock whose time only moves when something sleeps.
pub struct VirtualClock {
    start: Instant,
    offset: Mutex<Duration>,
    sleeps: AtomicU32,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            sleeps: AtomicU32::new(0),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

//! Chain capabilities and the RPC adapter behind them.
//!
//! # Data Flow
//! ```text
//! receivers / collect / claim
//!     → tx.rs (PreparedTx: to, data, value, function name, overrides)
//!     → ReadClient::call        (account-ID computation, ownership polling)
//!     → WriteClient::send_tx    (claim, splits, batched collection)
//!     → PendingTx::wait         (confirmations)
//! ```
//!
//! The core only ever talks to the traits below. `client.rs` and `wallet.rs`
//! provide an alloy-backed implementation for the CLI and for callers who do
//! not bring their own.
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod tx;
pub mod types;
pub mod wallet;

use std::future::Future;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::signers::Signature;

pub use client::{RpcClient, SigningClient};
pub use tx::{PreparedTx, TxOverrides};
pub use types::{ChainError, ChainResult, TxReceipt};
pub use wallet::Wallet;

/// Read access to a chain.
///
/// Implementations are shared by reference and must not require mutation.
pub trait ReadClient: Send + Sync {
    /// Execute `tx` as a read-only call and return the raw return data.
    fn call(&self, tx: &PreparedTx) -> impl Future<Output = ChainResult<Bytes>> + Send;

    /// The chain ID of the connected network.
    fn chain_id(&self) -> impl Future<Output = ChainResult<u64>> + Send;
}

/// A submitted transaction that can be awaited.
pub trait PendingTx: Send {
    /// Hash of the submitted transaction.
    fn hash(&self) -> TxHash;

    /// Wait for `confirmations` blocks and return the receipt.
    ///
    /// A reverted transaction is reported as [`ChainError::Reverted`].
    fn wait(self, confirmations: u64) -> impl Future<Output = ChainResult<TxReceipt>> + Send;
}

/// Read and write access to a chain, bound to one signer.
pub trait WriteClient: ReadClient {
    /// Handle returned by [`WriteClient::send_tx`].
    type Pending: PendingTx;

    /// Address of the signer.
    fn address(&self) -> impl Future<Output = ChainResult<Address>> + Send;

    /// Sign and broadcast `tx`.
    fn send_tx(&self, tx: PreparedTx) -> impl Future<Output = ChainResult<Self::Pending>> + Send;

    /// Sign an arbitrary message with the Ethereum message prefix.
    fn sign_message(&self, message: &[u8]) -> impl Future<Output = ChainResult<Signature>> + Send;
}

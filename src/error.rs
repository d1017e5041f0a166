//! Crate-level error type.
//!
//! # Error Kinds
//! - Configuration: raised before any network call, never retried
//! - Encoding/validation: wrapped [`CodecError`]s
//! - Network/chain: wrapped [`ChainError`]s, propagated unchanged
//! - Timeout: ownership polling deadline exceeded

use std::time::Duration;

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::chain::ChainError;
use crate::codec::CodecError;

/// Steps of the identity-claim workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStep {
    Claim,
    Ownership,
    Splits,
}

impl ClaimStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Ownership => "ownership",
            Self::Splits => "splits",
        }
    }
}

impl std::fmt::Display for ClaimStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the SDK entry points.
#[derive(Debug, Error)]
pub enum DripsError {
    /// The chain ID has no registry entry.
    #[error("unsupported chain ID {0}")]
    UnsupportedChain(u64),

    /// A receiver description lacks a required field.
    #[error("`{receiver_type}` receiver is missing required field `{field}`")]
    MissingReceiverField {
        receiver_type: &'static str,
        field: &'static str,
    },

    /// The receiver's `type` tag is not one the resolver knows.
    #[error("unsupported receiver type")]
    UnsupportedReceiverType,

    /// A project URL is not a supported `https://github.com/<owner>/<repo>` URL.
    #[error("invalid project URL `{url}`: {reason}")]
    InvalidProjectUrl { url: String, reason: &'static str },

    /// Resolved splits receivers cannot be stored on-chain as given.
    #[error("invalid splits receivers: {0}")]
    InvalidSplitsReceivers(String),

    /// A collection request named no tokens.
    #[error("at least one token address is required to collect")]
    EmptyTokenList,

    /// Auto-unwrap requested on a chain without an unwrapper contract.
    #[error("native token unwrapper is not configured for chain {0}")]
    UnwrapperNotConfigured(u64),

    /// Auto-unwrap can only pay out to the signer.
    #[error("transfer address {transfer_to} must equal the signer {signer} when auto-unwrapping")]
    TransferAddressMismatch { transfer_to: Address, signer: Address },

    /// The values attached to batched calls do not fit in a `uint256`.
    #[error("summed value of {calls} batched calls overflows uint256")]
    BatchValueOverflow { calls: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Return data from a contract call could not be decoded.
    #[error("failed to decode `{function}` return data: {reason}")]
    AbiDecode { function: &'static str, reason: String },

    /// The claimed account did not reach the expected owner in time.
    #[error("account {account_id} not owned by {expected_owner} after {timeout:?}")]
    OwnershipTimeout {
        account_id: U256,
        expected_owner: Address,
        timeout: Duration,
    },

    /// The step was skipped because an earlier step failed.
    #[error("{step} step not attempted: {blocked_by} step failed")]
    StepNotAttempted { step: ClaimStep, blocked_by: ClaimStep },
}

/// Result type for SDK operations.
pub type DripsResult<T> = Result<T, DripsError>;

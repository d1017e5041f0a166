//! Codec types and error definitions.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while encoding or decoding protocol identifiers.
///
/// These indicate caller misuse or corrupted upstream data and are never
/// repaired silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A stream config field does not fit its bit width.
    #[error("stream config field `{field}` = {value} does not fit in {bits} bits")]
    FieldOutOfRange {
        field: &'static str,
        value: U256,
        bits: u32,
    },

    /// Streams must move a non-zero amount per second.
    #[error("stream config `amountPerSec` must be greater than zero")]
    ZeroAmountPerSec,

    /// Account ID text is not an integer in `[0, 2^256 - 1]`.
    #[error("account ID `{0}` is not an integer in [0, 2^256 - 1]")]
    AccountIdOutOfRange(String),

    /// An AddressDriver account ID had bits set in positions 160..=223.
    #[error("account ID {0} is not an AddressDriver ID: reserved bits 160-223 are not zero")]
    NonZeroReservedBits(U256),

    /// The top 32 bits of an account ID do not name a known driver.
    #[error("unknown driver type {driver_id} for account ID {account_id}")]
    UnknownDriver { driver_id: u32, account_id: U256 },

    /// ORCID text does not match `dddd-dddd-dddd-dddX`.
    #[error("invalid ORCID format: `{0}`")]
    InvalidOrcidFormat(String),

    /// ORCID check character does not match the ISO 7064 MOD 11-2 checksum.
    #[error("invalid ORCID checksum for `{orcid}`: expected check character `{expected}`")]
    InvalidOrcidChecksum { orcid: String, expected: char },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Account-ID namespaces, keyed by the top 32 bits of an account ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriverName {
    Address,
    Nft,
    ImmutableSplits,
    Repo,
    RepoSubAccount,
    RepoDeadline,
}

impl DriverName {
    /// Map a raw driver ID to its name.
    pub fn from_driver_id(driver_id: u32) -> Option<Self> {
        match driver_id {
            0 => Some(Self::Address),
            1 => Some(Self::Nft),
            2 => Some(Self::ImmutableSplits),
            3 => Some(Self::Repo),
            4 => Some(Self::RepoSubAccount),
            5 => Some(Self::RepoDeadline),
            _ => None,
        }
    }

    /// The raw driver ID stored in the top 32 bits.
    pub fn driver_id(self) -> u32 {
        match self {
            Self::Address => 0,
            Self::Nft => 1,
            Self::ImmutableSplits => 2,
            Self::Repo => 3,
            Self::RepoSubAccount => 4,
            Self::RepoDeadline => 5,
        }
    }

    /// Protocol name as used by the contracts and the subgraph.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Nft => "nft",
            Self::ImmutableSplits => "immutableSplits",
            Self::Repo => "repo",
            Self::RepoSubAccount => "repoSubAccount",
            Self::RepoDeadline => "repoDeadline",
        }
    }
}

impl std::fmt::Display for DriverName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Receiver types.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::{SplitsReceiver, MAX_SPLITS_RECEIVERS, TOTAL_SPLITS_WEIGHT};
use crate::error::{DripsError, DripsResult};

/// A user-facing splits receiver, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SdkSplitsReceiver {
    /// A source-code project, identified by its repository URL.
    Project { url: String, weight: u32 },
    /// A drip list, already identified by its account ID.
    DripList { account_id: U256, weight: u32 },
    /// A sub-list of an ecosystem.
    SubList { account_id: U256, weight: u32 },
    /// A plain address, receiving through the AddressDriver.
    Address { address: Address, weight: u32 },
    /// The main account of an ecosystem.
    EcosystemMainAccount { account_id: U256, weight: u32 },
    /// Any `type` tag not listed above.
    #[serde(other)]
    Unsupported,
}

impl SdkSplitsReceiver {
    /// The `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Project { .. } => "project",
            Self::DripList { .. } => "drip-list",
            Self::SubList { .. } => "sub-list",
            Self::Address { .. } => "address",
            Self::EcosystemMainAccount { .. } => "ecosystem-main-account",
            Self::Unsupported => "unsupported",
        }
    }

    /// The requested weight, if the receiver kind is known.
    pub fn weight(&self) -> Option<u32> {
        match self {
            Self::Project { weight, .. }
            | Self::DripList { weight, .. }
            | Self::SubList { weight, .. }
            | Self::Address { weight, .. }
            | Self::EcosystemMainAccount { weight, .. } => Some(*weight),
            Self::Unsupported => None,
        }
    }
}

/// A receiver in its on-chain form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainSplitsReceiver {
    pub account_id: U256,
    /// Parts of [`TOTAL_SPLITS_WEIGHT`].
    pub weight: u32,
}

impl From<OnChainSplitsReceiver> for SplitsReceiver {
    fn from(receiver: OnChainSplitsReceiver) -> Self {
        SplitsReceiver {
            accountId: receiver.account_id,
            weight: receiver.weight,
        }
    }
}

/// Put receivers into the form the Drips contract stores: sorted by account
/// ID, without duplicates, at most [`MAX_SPLITS_RECEIVERS`] entries, and a
/// total weight not above [`TOTAL_SPLITS_WEIGHT`].
pub fn format_splits_receivers(
    mut receivers: Vec<OnChainSplitsReceiver>,
) -> DripsResult<Vec<OnChainSplitsReceiver>> {
    if receivers.len() > MAX_SPLITS_RECEIVERS {
        return Err(DripsError::InvalidSplitsReceivers(format!(
            "{} receivers exceed the maximum of {}",
            receivers.len(),
            MAX_SPLITS_RECEIVERS
        )));
    }

    receivers.sort_by_key(|r| r.account_id);

    if let Some(pair) = receivers.windows(2).find(|pair| pair[0].account_id == pair[1].account_id) {
        return Err(DripsError::InvalidSplitsReceivers(format!(
            "duplicate receiver account ID {}",
            pair[0].account_id
        )));
    }

    let total: u64 = receivers.iter().map(|r| u64::from(r.weight)).sum();
    if total > u64::from(TOTAL_SPLITS_WEIGHT) {
        return Err(DripsError::InvalidSplitsReceivers(format!(
            "total weight {} exceeds {}",
            total, TOTAL_SPLITS_WEIGHT
        )));
    }

    Ok(receivers)
}

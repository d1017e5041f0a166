//! Claim workflow types.

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use uuid::Uuid;

use crate::codec::Orcid;
use crate::config::ClaimConfig;
use crate::error::{DripsError, DripsResult};

/// Outcome of one claim step.
#[derive(Debug)]
pub enum StepResult<T> {
    Success(T),
    Failed(DripsError),
}

impl<T> StepResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The step's data, if it succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failed(_) => None,
        }
    }

    /// The step's error, if it failed.
    pub fn error(&self) -> Option<&DripsError> {
        match self {
            Self::Success(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

impl<T> From<DripsResult<T>> for StepResult<T> {
    fn from(result: DripsResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Overall outcome of a claim run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    /// Every step succeeded.
    Complete,
    /// The claim landed but a later step failed.
    Partial,
    /// The claim itself failed.
    Failed,
}

/// The claim transaction was mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// Account ID of the claimed ORCID.
    pub account_id: U256,
    pub tx_hash: TxHash,
}

/// The claimed account reached the expected owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipConfirmed {
    pub owner: Address,
    /// Time from the first poll to the confirming poll.
    pub elapsed: Duration,
    pub polls: u32,
}

/// The claimed account now splits everything to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitsConfigured {
    /// The owner's AddressDriver account ID, the sole receiver.
    pub receiver_account_id: U256,
    pub tx_hash: TxHash,
}

/// Per-step record of a claim run.
#[derive(Debug)]
pub struct ClaimOrcidResult {
    pub run_id: Uuid,
    pub orcid: Orcid,
    pub claim: StepResult<ClaimReceipt>,
    pub ownership: StepResult<OwnershipConfirmed>,
    pub splits: StepResult<SplitsConfigured>,
}

impl ClaimOrcidResult {
    /// Status derived from which steps succeeded.
    pub fn status(&self) -> ClaimStatus {
        if !self.claim.is_success() {
            ClaimStatus::Failed
        } else if self.ownership.is_success() && self.splits.is_success() {
            ClaimStatus::Complete
        } else {
            ClaimStatus::Partial
        }
    }
}

/// Progress callback, called with the elapsed polling time on every poll.
pub type ProgressFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Tuning for one claim run.
pub struct ClaimOptions {
    /// Owner to wait for; defaults to the signer.
    pub expected_owner: Option<Address>,
    pub poll_interval: Duration,
    /// Polling deadline, measured from the first poll.
    pub timeout: Duration,
    /// Confirmations awaited for the claim and splits transactions.
    pub confirmations: u64,
    pub on_progress: Option<ProgressFn>,
}

impl Default for ClaimOptions {
    fn default() -> Self {
        Self::from(&ClaimConfig::default())
    }
}

impl From<&ClaimConfig> for ClaimOptions {
    fn from(config: &ClaimConfig) -> Self {
        Self {
            expected_owner: None,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            timeout: Duration::from_secs(config.timeout_secs),
            confirmations: config.confirmations,
            on_progress: None,
        }
    }
}

impl std::fmt::Debug for ClaimOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimOptions")
            .field("expected_owner", &self.expected_owner)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .field("confirmations", &self.confirmations)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

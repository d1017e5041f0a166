//! Ownership polling.

use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::chain::ReadClient;
use crate::claim::clock::Clock;
use crate::claim::types::OwnershipConfirmed;
use crate::contracts::{view_call, RepoDriver};
use crate::error::{DripsError, DripsResult};
use crate::registry::ChainContracts;

/// Polling cadence and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

/// `RepoDriver.ownerOf(accountId)`.
pub async fn owner_of<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    account_id: U256,
) -> DripsResult<Address> {
    let call = RepoDriver::ownerOfCall {
        accountId: account_id,
    };
    view_call(client, contracts.repo_driver, &call).await
}

/// Poll `ownerOf(account_id)` until it equals `expected_owner`.
///
/// The deadline runs from the first poll and bounds every read and sleep.
/// Read failures are logged and polling continues; only the deadline ends
/// the wait unsuccessfully.
pub async fn wait_for_owner<C: ReadClient, K: Clock>(
    client: &C,
    contracts: &ChainContracts,
    account_id: U256,
    expected_owner: Address,
    options: PollOptions,
    clock: &K,
    on_progress: Option<&(dyn Fn(Duration) + Send + Sync)>,
) -> DripsResult<OwnershipConfirmed> {
    let started = clock.now();
    let mut polls = 0u32;

    loop {
        let elapsed = clock.now().saturating_duration_since(started);
        if elapsed >= options.timeout {
            tracing::warn!(
                account_id = %account_id,
                expected_owner = %expected_owner,
                polls,
                "Ownership not confirmed before deadline"
            );
            return Err(DripsError::OwnershipTimeout {
                account_id,
                expected_owner,
                timeout: options.timeout,
            });
        }

        polls += 1;
        if let Some(on_progress) = on_progress {
            on_progress(elapsed);
        }

        let remaining = options.timeout - elapsed;
        let read = tokio::select! {
            biased;
            read = owner_of(client, contracts, account_id) => Some(read),
            _ = clock.sleep(remaining) => None,
        };

        match read {
            Some(Ok(owner)) if owner == expected_owner => {
                tracing::info!(owner = %owner, polls, ?elapsed, "Ownership confirmed");
                return Ok(OwnershipConfirmed {
                    owner,
                    elapsed,
                    polls,
                });
            }
            Some(Ok(owner)) => {
                tracing::debug!(owner = %owner, polls, "Owner not updated yet");
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, polls, "Owner read failed, will retry");
            }
            None => {
                tracing::warn!(polls, "Owner read still pending at deadline");
                continue;
            }
        }

        let elapsed = clock.now().saturating_duration_since(started);
        let remaining = options.timeout.saturating_sub(elapsed);
        clock.sleep(options.interval.min(remaining)).await;
    }
}

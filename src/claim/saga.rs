//! Claim saga: claim, wait for the oracle, point splits at the owner.

use alloy::primitives::{Address, Bytes, U256};
use tracing::Instrument;
use uuid::Uuid;

use crate::chain::{PendingTx, PreparedTx, TxReceipt, WriteClient};
use crate::claim::clock::{Clock, TokioClock};
use crate::claim::polling::{wait_for_owner, PollOptions};
use crate::claim::types::{
    ClaimOptions, ClaimOrcidResult, ClaimReceipt, ClaimStatus, OwnershipConfirmed, SplitsConfigured,
    StepResult,
};
use crate::codec::Orcid;
use crate::collect::encode_batch;
use crate::contracts::{Forge, RepoDriver, SplitsReceiver, TOTAL_SPLITS_WEIGHT};
use crate::error::{ClaimStep, DripsError, DripsResult};
use crate::observability::metrics;
use crate::receivers::{calc_address_account_id, calc_project_account_id};
use crate::registry::{ChainContracts, ContractRegistry};

enum ClaimState {
    Claiming,
    WaitingForOwnership(ClaimReceipt),
    ConfiguringSplits(ClaimReceipt, OwnershipConfirmed),
    Done(ClaimOrcidResult),
}

/// One claim run, bound to a client, chain and signer.
pub struct ClaimOrcidSaga<'a, W, K> {
    client: &'a W,
    contracts: &'a ChainContracts,
    clock: &'a K,
    orcid: Orcid,
    signer: Address,
    options: ClaimOptions,
    run_id: Uuid,
}

impl<'a, W: WriteClient, K: Clock> ClaimOrcidSaga<'a, W, K> {
    pub fn new(
        client: &'a W,
        contracts: &'a ChainContracts,
        clock: &'a K,
        orcid: Orcid,
        signer: Address,
        options: ClaimOptions,
    ) -> Self {
        Self {
            client,
            contracts,
            clock,
            orcid,
            signer,
            options,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Drive the saga to completion. Never fails; see [`ClaimOrcidResult`].
    pub async fn run(self) -> ClaimOrcidResult {
        let span = tracing::info_span!("claim_orcid", run_id = %self.run_id, orcid = %self.orcid);
        self.drive().instrument(span).await
    }

    async fn drive(&self) -> ClaimOrcidResult {
        let mut state = ClaimState::Claiming;

        loop {
            state = match state {
                ClaimState::Claiming => match self.step(ClaimStep::Claim, self.claim()).await {
                    Ok(receipt) => ClaimState::WaitingForOwnership(receipt),
                    Err(error) => ClaimState::Done(self.finish(
                        StepResult::Failed(error),
                        not_attempted(ClaimStep::Ownership, ClaimStep::Claim),
                        not_attempted(ClaimStep::Splits, ClaimStep::Claim),
                    )),
                },
                ClaimState::WaitingForOwnership(receipt) => {
                    match self.step(ClaimStep::Ownership, self.wait_for_ownership(&receipt)).await {
                        Ok(confirmed) => ClaimState::ConfiguringSplits(receipt, confirmed),
                        Err(error) => ClaimState::Done(self.finish(
                            StepResult::Success(receipt),
                            StepResult::Failed(error),
                            not_attempted(ClaimStep::Splits, ClaimStep::Ownership),
                        )),
                    }
                }
                ClaimState::ConfiguringSplits(receipt, confirmed) => {
                    let splits = self.step(ClaimStep::Splits, self.configure_splits(&receipt)).await;
                    ClaimState::Done(self.finish(
                        StepResult::Success(receipt),
                        StepResult::Success(confirmed),
                        splits.into(),
                    ))
                }
                ClaimState::Done(result) => {
                    let status = result.status();
                    if status == ClaimStatus::Complete {
                        tracing::info!(?status, "ORCID claim finished");
                    } else {
                        tracing::warn!(?status, "ORCID claim finished");
                    }
                    return result;
                }
            };
        }
    }

    async fn step<T>(
        &self,
        step: ClaimStep,
        work: impl std::future::Future<Output = DripsResult<T>>,
    ) -> DripsResult<T> {
        tracing::info!(step = step.as_str(), "Starting claim step");
        let result = work.await;
        metrics::record_claim_step(step.as_str(), result.is_ok());
        if let Err(e) = &result {
            tracing::error!(step = step.as_str(), error = %e, "Claim step failed");
        }
        result
    }

    async fn claim(&self) -> DripsResult<ClaimReceipt> {
        let account_id =
            calc_project_account_id(self.client, self.contracts, Forge::Orcid, self.orcid.as_str())
                .await?;
        let receipt = self
            .send_and_wait(request_update_owner(self.contracts, &self.orcid))
            .await?;

        Ok(ClaimReceipt {
            account_id,
            tx_hash: receipt.tx_hash,
        })
    }

    async fn wait_for_ownership(&self, claimed: &ClaimReceipt) -> DripsResult<OwnershipConfirmed> {
        let options = PollOptions {
            interval: self.options.poll_interval,
            timeout: self.options.timeout,
        };
        wait_for_owner(
            self.client,
            self.contracts,
            claimed.account_id,
            self.options.expected_owner.unwrap_or(self.signer),
            options,
            self.clock,
            self.options.on_progress.as_deref(),
        )
        .await
    }

    async fn configure_splits(&self, claimed: &ClaimReceipt) -> DripsResult<SplitsConfigured> {
        let own_account_id = calc_address_account_id(self.client, self.contracts, self.signer).await?;
        let receipt = self
            .send_and_wait(set_splits_to(self.contracts, claimed.account_id, own_account_id))
            .await?;

        Ok(SplitsConfigured {
            receiver_account_id: own_account_id,
            tx_hash: receipt.tx_hash,
        })
    }

    async fn send_and_wait(&self, tx: PreparedTx) -> DripsResult<TxReceipt> {
        let function = tx.abi_function_name.clone();
        let pending = self.client.send_tx(tx).await?;
        tracing::debug!(function = %function, tx_hash = %pending.hash(), "Transaction sent");
        Ok(pending.wait(self.options.confirmations).await?)
    }

    fn finish(
        &self,
        claim: StepResult<ClaimReceipt>,
        ownership: StepResult<OwnershipConfirmed>,
        splits: StepResult<SplitsConfigured>,
    ) -> ClaimOrcidResult {
        ClaimOrcidResult {
            run_id: self.run_id,
            orcid: self.orcid.clone(),
            claim,
            ownership,
            splits,
        }
    }
}

fn not_attempted<T>(step: ClaimStep, blocked_by: ClaimStep) -> StepResult<T> {
    StepResult::Failed(DripsError::StepNotAttempted { step, blocked_by })
}

fn request_update_owner(contracts: &ChainContracts, orcid: &Orcid) -> PreparedTx {
    let call = RepoDriver::requestUpdateOwnerCall {
        forge: Forge::Orcid.as_u8(),
        name: Bytes::copy_from_slice(orcid.as_str().as_bytes()),
    };
    PreparedTx::from_call(contracts.repo_driver, &call)
}

fn set_splits_to(contracts: &ChainContracts, account_id: U256, receiver_account_id: U256) -> PreparedTx {
    let call = RepoDriver::setSplitsCall {
        accountId: account_id,
        receivers: vec![SplitsReceiver {
            accountId: receiver_account_id,
            weight: TOTAL_SPLITS_WEIGHT,
        }],
    };
    PreparedTx::from_call(contracts.repo_driver, &call)
}

struct ClaimContext<'a> {
    orcid: Orcid,
    contracts: &'a ChainContracts,
    signer: Address,
}

async fn claim_context<'a, W: WriteClient>(
    client: &W,
    registry: &'a ContractRegistry,
    orcid: &str,
) -> DripsResult<ClaimContext<'a>> {
    let orcid = Orcid::parse(orcid)?;
    let chain_id = client.chain_id().await?;
    let contracts = registry.contracts_for(chain_id)?;
    let signer = client.address().await?;
    Ok(ClaimContext {
        orcid,
        contracts,
        signer,
    })
}

/// Claim `orcid` for the signer and route its splits to the signer.
///
/// Invalid ORCIDs, unsupported chains and signer lookups fail before any
/// step runs. Everything after that is reported per step in the result.
pub async fn claim_orcid<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    orcid: &str,
    options: ClaimOptions,
) -> DripsResult<ClaimOrcidResult> {
    claim_orcid_with_clock(client, registry, orcid, options, &TokioClock).await
}

/// [`claim_orcid`] with an explicit clock for polling.
pub async fn claim_orcid_with_clock<W: WriteClient, K: Clock>(
    client: &W,
    registry: &ContractRegistry,
    orcid: &str,
    options: ClaimOptions,
    clock: &K,
) -> DripsResult<ClaimOrcidResult> {
    let ctx = claim_context(client, registry, orcid).await?;
    let saga = ClaimOrcidSaga::new(client, ctx.contracts, clock, ctx.orcid, ctx.signer, options);
    Ok(saga.run().await)
}

/// Build the claim and splits calls as one `callBatched` transaction.
///
/// Nothing is sent. The splits call only succeeds once the oracle has
/// assigned ownership, so the batch is meant for callers that submit it later.
pub async fn prepare_claim_orcid<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    orcid: &str,
) -> DripsResult<PreparedTx> {
    let ctx = claim_context(client, registry, orcid).await?;
    let account_id =
        calc_project_account_id(client, ctx.contracts, Forge::Orcid, ctx.orcid.as_str()).await?;
    let own_account_id = calc_address_account_id(client, ctx.contracts, ctx.signer).await?;

    let calls = [
        request_update_owner(ctx.contracts, &ctx.orcid),
        set_splits_to(ctx.contracts, account_id, own_account_id),
    ];
    encode_batch(ctx.contracts.caller, &calls, None)
}

//! Collection planner.
//!
//! # Responsibilities
//! - Reject requests that cannot be planned before building anything
//! - Resolve the current splits receivers once, through the resolver
//! - Emit calls per token in the fixed order
//!   `squeezeStreams* → receiveStreams → split → collect (→ unwrap)`

use alloy::primitives::{Address, U256};

use crate::chain::{PreparedTx, TxOverrides, WriteClient};
use crate::collect::batch::encode_batch;
use crate::collect::types::CollectConfig;
use crate::contracts::{
    AddressDriver, Drips, NativeTokenUnwrapper, SplitsReceiver, RECEIVE_STREAMS_MAX_CYCLES,
};
use crate::error::{DripsError, DripsResult};
use crate::observability::metrics;
use crate::receivers::receivers_on;
use crate::registry::ContractRegistry;

/// The ordered calls realizing one collection, before batching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectPlan {
    /// Chain the plan was built for.
    pub chain_id: u64,
    /// Caller contract that executes the batch.
    pub caller: Address,
    /// Calls in execution order.
    pub calls: Vec<PreparedTx>,
}

impl CollectPlan {
    /// Function names of the calls, in order.
    pub fn function_names(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.abi_function_name.as_str()).collect()
    }

    /// Fold the plan into one `callBatched` transaction.
    pub fn into_batched_tx(self, overrides: Option<TxOverrides>) -> DripsResult<PreparedTx> {
        encode_batch(self.caller, &self.calls, overrides)
    }
}

/// Where collected funds go.
#[derive(Clone, Copy)]
enum Payout {
    /// Collect straight to the recipient.
    Direct(Address),
    /// Collect to the unwrapper, then unwrap to the recipient.
    Unwrap { unwrapper: Address, recipient: Address },
}

/// Build the ordered call list for `config`.
pub async fn plan_collection<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    config: &CollectConfig,
) -> DripsResult<CollectPlan> {
    if config.token_addresses.is_empty() {
        return Err(DripsError::EmptyTokenList);
    }

    let chain_id = client.chain_id().await?;
    let contracts = registry.contracts_for(chain_id)?;
    let signer = client.address().await?;

    let payout = if config.should_auto_unwrap {
        let unwrapper = contracts
            .native_token_unwrapper
            .ok_or(DripsError::UnwrapperNotConfigured(chain_id))?;
        if let Some(transfer_to) = config.transfer_to_address {
            if transfer_to != signer {
                return Err(DripsError::TransferAddressMismatch { transfer_to, signer });
            }
        }
        Payout::Unwrap {
            unwrapper,
            recipient: signer,
        }
    } else {
        Payout::Direct(config.transfer_to_address.unwrap_or(signer))
    };

    // Squeezes for tokens outside the request are ignored, not validated.
    let squeezes = config
        .squeeze_args
        .iter()
        .filter(|args| config.token_addresses.contains(&args.token_address))
        .map(|args| Ok((args.token_address, args.to_call(config.account_id)?)))
        .collect::<DripsResult<Vec<_>>>()?;

    let receivers: Vec<SplitsReceiver> = if config.should_skip_split {
        Vec::new()
    } else {
        receivers_on(client, contracts, &config.current_receivers)
            .await?
            .into_iter()
            .map(Into::into)
            .collect()
    };

    let mut calls = Vec::new();
    for &token in &config.token_addresses {
        for (_, squeeze) in squeezes.iter().filter(|(squeeze_token, _)| *squeeze_token == token) {
            calls.push(PreparedTx::from_call(contracts.drips, squeeze));
        }

        if !config.should_skip_receive {
            calls.push(receive_streams(contracts.drips, config.account_id, token));
        }

        if !config.should_skip_split {
            let split = Drips::splitCall {
                accountId: config.account_id,
                erc20: token,
                currReceivers: receivers.clone(),
            };
            calls.push(PreparedTx::from_call(contracts.drips, &split));
        }

        match payout {
            Payout::Direct(recipient) => {
                calls.push(collect_to(contracts.address_driver, token, recipient));
            }
            Payout::Unwrap { unwrapper, recipient } => {
                calls.push(collect_to(contracts.address_driver, token, unwrapper));
                let unwrap = NativeTokenUnwrapper::unwrapCall { recipient };
                calls.push(PreparedTx::from_call(unwrapper, &unwrap));
            }
        }
    }

    metrics::record_planned_calls(calls.len());
    tracing::debug!(
        chain_id,
        tokens = config.token_addresses.len(),
        calls = calls.len(),
        auto_unwrap = config.should_auto_unwrap,
        "Collection planned"
    );

    Ok(CollectPlan {
        chain_id,
        caller: contracts.caller,
        calls,
    })
}

fn receive_streams(drips: Address, account_id: U256, token: Address) -> PreparedTx {
    let call = Drips::receiveStreamsCall {
        accountId: account_id,
        erc20: token,
        maxCycles: RECEIVE_STREAMS_MAX_CYCLES,
    };
    PreparedTx::from_call(drips, &call)
}

fn collect_to(address_driver: Address, token: Address, transfer_to: Address) -> PreparedTx {
    let call = AddressDriver::collectCall {
        erc20: token,
        transferTo: transfer_to,
    };
    PreparedTx::from_call(address_driver, &call)
}

/// The ordered, unbatched calls for `config`.
pub async fn build_collect_calls<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    config: &CollectConfig,
) -> DripsResult<Vec<PreparedTx>> {
    Ok(plan_collection(client, registry, config).await?.calls)
}

/// One atomic `callBatched` transaction realizing `config`.
pub async fn prepare_collection<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    config: &CollectConfig,
) -> DripsResult<PreparedTx> {
    let plan = plan_collection(client, registry, config).await?;
    plan.into_batched_tx(config.batched_tx_overrides.clone())
}

/// Prepare and broadcast the collection transaction.
pub async fn collect<W: WriteClient>(
    client: &W,
    registry: &ContractRegistry,
    config: &CollectConfig,
) -> DripsResult<W::Pending> {
    let tx = prepare_collection(client, registry, config).await?;
    let pending = client.send_tx(tx).await?;

    tracing::info!(account_id = %config.account_id, "Collection transaction sent");
    Ok(pending)
}

//! Batch encoding through the Caller contract.

use alloy::primitives::{Address, U256};

use crate::chain::{PreparedTx, TxOverrides};
use crate::contracts::{Call, Caller};
use crate::error::{DripsError, DripsResult};

/// Convert a prepared call into a Caller `Call` tuple.
pub fn to_caller_call(tx: &PreparedTx) -> Call {
    Call {
        target: tx.to,
        data: tx.data.clone(),
        value: tx.value,
    }
}

/// Fold `calls` into one `Caller.callBatched` transaction.
///
/// Calls keep their order; the batch carries the sum of their values.
pub fn encode_batch(
    caller: Address,
    calls: &[PreparedTx],
    overrides: Option<TxOverrides>,
) -> DripsResult<PreparedTx> {
    let value = calls.iter().try_fold(U256::ZERO, |total, call| {
        total
            .checked_add(call.value)
            .ok_or(DripsError::BatchValueOverflow { calls: calls.len() })
    })?;
    let batched = Caller::callBatchedCall {
        calls: calls.iter().map(to_caller_call).collect(),
    };

    let mut tx = PreparedTx::from_call(caller, &batched).with_overrides(overrides.unwrap_or_default());
    tx.value = value;
    Ok(tx)
}

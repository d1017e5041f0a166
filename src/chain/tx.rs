//! Prepared transactions.
//!
//! A [`PreparedTx`] is plain data: the target, the ABI-encoded call data, the
//! attached value and optional gas overrides. It is built once per contract
//! call and handed to a [`WriteClient`](crate::chain::WriteClient) unchanged.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

/// Optional gas and nonce overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

/// A contract call, encoded and ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTx {
    /// Contract being called.
    pub to: Address,
    /// ABI-encoded call data (selector + arguments).
    pub data: Bytes,
    /// Native value attached to the call.
    pub value: U256,
    /// Name of the encoded function, e.g. `receiveStreams`.
    pub abi_function_name: String,
    /// Gas and nonce overrides.
    #[serde(flatten)]
    pub overrides: TxOverrides,
}

impl PreparedTx {
    /// Encode `call` against the contract at `to`, with no value attached.
    pub fn from_call<C: SolCall>(to: Address, call: &C) -> Self {
        Self {
            to,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
            abi_function_name: function_name(C::SIGNATURE).to_string(),
            overrides: TxOverrides::default(),
        }
    }

    /// Replace the overrides.
    pub fn with_overrides(mut self, overrides: TxOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The 4-byte function selector, if the call data carries one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }

    /// Convert into an RPC transaction request.
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .with_to(self.to)
            .with_input(self.data.clone())
            .with_value(self.value);

        if let Some(gas_limit) = self.overrides.gas_limit {
            request = request.with_gas_limit(gas_limit);
        }
        if let Some(max_fee) = self.overrides.max_fee_per_gas {
            request = request.with_max_fee_per_gas(max_fee);
        }
        if let Some(priority_fee) = self.overrides.max_priority_fee_per_gas {
            request = request.with_max_priority_fee_per_gas(priority_fee);
        }
        if let Some(nonce) = self.overrides.nonce {
            request = request.with_nonce(nonce);
        }

        request
    }
}

/// `collect(address,address)` -> `collect`
fn function_name(signature: &'static str) -> &'static str {
    signature.split('(').next().unwrap_or(signature)
}

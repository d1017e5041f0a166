//! Collection request types.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::chain::TxOverrides;
use crate::codec::{encode_stream_config, CodecResult, StreamConfig};
use crate::contracts::{Drips, StreamReceiver, StreamsHistory};
use crate::receivers::SdkSplitsReceiver;

/// A request to collect an account's funds for one or more tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectConfig {
    /// The collecting account (the signer's AddressDriver account).
    pub account_id: U256,
    /// The account's current splits receivers, needed by `split`.
    #[serde(default)]
    pub current_receivers: Vec<SdkSplitsReceiver>,
    /// Tokens to collect, processed in this order.
    pub token_addresses: Vec<Address>,
    /// Streams to squeeze before receiving.
    #[serde(default)]
    pub squeeze_args: Vec<SqueezeArgs>,
    #[serde(default)]
    pub should_skip_split: bool,
    #[serde(default)]
    pub should_skip_receive: bool,
    /// Collect wrapped native tokens through the unwrapper and receive
    /// native currency instead.
    #[serde(default)]
    pub should_auto_unwrap: bool,
    /// Recipient of collected funds; defaults to the signer.
    #[serde(default)]
    pub transfer_to_address: Option<Address>,
    /// Overrides applied to the final batched transaction.
    #[serde(default)]
    pub batched_tx_overrides: Option<TxOverrides>,
}

/// Arguments for squeezing one sender's streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqueezeArgs {
    pub token_address: Address,
    pub sender_id: U256,
    pub history_hash: B256,
    pub streams_history: Vec<StreamsHistoryEntry>,
}

/// One entry of a sender's streams history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamsHistoryEntry {
    pub streams_hash: B256,
    pub receivers: Vec<StreamReceiverEntry>,
    pub update_time: u32,
    pub max_end: u32,
}

/// A stream receiver with its config in unpacked form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamReceiverEntry {
    pub account_id: U256,
    pub config: StreamConfig,
}

impl SqueezeArgs {
    /// Build the `squeezeStreams` call for `account_id`, packing every
    /// stream config.
    pub fn to_call(&self, account_id: U256) -> CodecResult<Drips::squeezeStreamsCall> {
        let streams_history = self
            .streams_history
            .iter()
            .map(StreamsHistoryEntry::to_sol)
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Drips::squeezeStreamsCall {
            accountId: account_id,
            erc20: self.token_address,
            senderId: self.sender_id,
            historyHash: self.history_hash,
            streamsHistory: streams_history,
        })
    }
}

impl StreamsHistoryEntry {
    fn to_sol(&self) -> CodecResult<StreamsHistory> {
        let receivers = self
            .receivers
            .iter()
            .map(|receiver| {
                Ok(StreamReceiver {
                    accountId: receiver.account_id,
                    config: encode_stream_config(&receiver.config)?,
                })
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(StreamsHistory {
            streamsHash: self.streams_hash,
            receivers,
            updateTime: self.update_time,
            maxEnd: self.max_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[test]
    fn test_minimal_request_defaults() {
        let config: CollectConfig = serde_json::from_str(
            r#"{"accountId": "0x1", "tokenAddresses": ["0x0000000000000000000000000000000000000001"]}"#,
        )
        .unwrap();

        assert!(config.current_receivers.is_empty());
        assert!(config.squeeze_args.is_empty());
        assert!(!config.should_skip_split && !config.should_skip_receive && !config.should_auto_unwrap);
        assert!(config.transfer_to_address.is_none());
    }

    #[test]
    fn test_squeeze_call_packs_stream_configs() {
        let config = StreamConfig {
            drip_id: 1,
            amount_per_sec: U256::from(10),
            start: 0,
            duration: 0,
        };
        let args = SqueezeArgs {
            token_address: Address::repeat_byte(0xaa),
            sender_id: U256::from(77),
            history_hash: B256::ZERO,
            streams_history: vec![StreamsHistoryEntry {
                streams_hash: B256::repeat_byte(1),
                receivers: vec![StreamReceiverEntry {
                    account_id: U256::from(5),
                    config,
                }],
                update_time: 100,
                max_end: 200,
            }],
        };

        let call = args.to_call(U256::from(9)).unwrap();
        assert_eq!(call.accountId, U256::from(9));
        assert_eq!(call.senderId, U256::from(77));
        assert_eq!(
            call.streamsHistory[0].receivers[0].config,
            encode_stream_config(&config).unwrap()
        );
    }

    #[test]
    fn test_squeeze_call_rejects_invalid_config() {
        let args = SqueezeArgs {
            token_address: Address::ZERO,
            sender_id: U256::ZERO,
            history_hash: B256::ZERO,
            streams_history: vec![StreamsHistoryEntry {
                streams_hash: B256::ZERO,
                receivers: vec![StreamReceiverEntry {
                    account_id: U256::from(5),
                    config: StreamConfig {
                        drip_id: 1,
                        amount_per_sec: U256::ZERO,
                        start: 0,
                        duration: 0,
                    },
                }],
                update_time: 0,
                max_end: 0,
            }],
        };
        assert_eq!(args.to_call(U256::from(1)).unwrap_err(), CodecError::ZeroAmountPerSec);
    }
}

//! Collection planning against a mock chain.

use alloy::primitives::{address, Address, TxHash, B256, U256};
use alloy::sol_types::SolCall;

use drips_sdk::codec::StreamConfig;
use drips_sdk::collect::{build_collect_calls, collect, plan_collection, prepare_collection, CollectConfig};
use drips_sdk::collect::{SqueezeArgs, StreamReceiverEntry, StreamsHistoryEntry};
use drips_sdk::contracts::{AddressDriver, Caller, Drips, NativeTokenUnwrapper, TOTAL_SPLITS_WEIGHT};
use drips_sdk::receivers::SdkSplitsReceiver;
use drips_sdk::registry::ContractRegistry;
use drips_sdk::{DripsError, PendingTx, TxOverrides};

mod common;

use common::{mainnet_contracts, registry_with_unwrapper, MockChain, SIGNER, UNWRAPPER};

const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");

fn base_config(tokens: Vec<Address>) -> CollectConfig {
    CollectConfig {
        account_id: U256::from(42u64),
        current_receivers: vec![SdkSplitsReceiver::Address {
            address: address!("00000000000000000000000000000000000000b0"),
            weight: TOTAL_SPLITS_WEIGHT / 2,
        }],
        token_addresses: tokens,
        squeeze_args: Vec::new(),
        should_skip_split: false,
        should_skip_receive: false,
        should_auto_unwrap: false,
        transfer_to_address: None,
        batched_tx_overrides: None,
    }
}

fn squeeze(token: Address, sender: u64) -> SqueezeArgs {
    SqueezeArgs {
        token_address: token,
        sender_id: U256::from(sender),
        history_hash: B256::ZERO,
        streams_history: vec![StreamsHistoryEntry {
            streams_hash: B256::repeat_byte(1),
            receivers: vec![StreamReceiverEntry {
                account_id: U256::from(42u64),
                config: StreamConfig {
                    drip_id: 1,
                    amount_per_sec: U256::from(1_000_000_000u64),
                    start: 0,
                    duration: 0,
                },
            }],
            update_time: 1_700_000_000,
            max_end: 1_800_000_000,
        }],
    }
}

#[tokio::test]
async fn test_full_collection_order() {
    let chain = MockChain::new();
    let registry = ContractRegistry::with_defaults();
    let mut config = base_config(vec![DAI]);
    config.squeeze_args = vec![squeeze(DAI, 7)];

    let plan = plan_collection(&chain, &registry, &config).await.unwrap();

    assert_eq!(
        plan.function_names(),
        vec!["squeezeStreams", "receiveStreams", "split", "collect"]
    );
    let contracts = mainnet_contracts();
    assert_eq!(plan.caller, contracts.caller);
    assert_eq!(plan.calls[3].to, contracts.address_driver);

    let collect = AddressDriver::collectCall::abi_decode(&plan.calls[3].data).unwrap();
    assert_eq!(collect.erc20, DAI);
    assert_eq!(collect.transferTo, SIGNER);

    let split = Drips::splitCall::abi_decode(&plan.calls[2].data).unwrap();
    assert_eq!(split.currReceivers.len(), 1);
    assert_eq!(split.currReceivers[0].weight, TOTAL_SPLITS_WEIGHT / 2);

    // Nothing is sent while planning.
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_skipping_receive_and_split_leaves_only_collect() {
    let chain = MockChain::new();
    let mut config = base_config(vec![DAI]);
    config.should_skip_receive = true;
    config.should_skip_split = true;

    let calls = build_collect_calls(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap();

    let names: Vec<_> = calls.iter().map(|c| c.abi_function_name.as_str()).collect();
    assert_eq!(names, vec!["collect"]);
    // Receivers are not resolved when the split is skipped.
    assert_eq!(chain.read_count(), 0);
}

#[tokio::test]
async fn test_squeezes_are_filtered_per_token() {
    let chain = MockChain::new();
    let mut config = base_config(vec![DAI, WETH]);
    config.squeeze_args = vec![squeeze(WETH, 1), squeeze(DAI, 2), squeeze(WETH, 3)];

    let plan = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap();

    assert_eq!(
        plan.function_names(),
        vec![
            "squeezeStreams",
            "receiveStreams",
            "split",
            "collect",
            "squeezeStreams",
            "squeezeStreams",
            "receiveStreams",
            "split",
            "collect",
        ]
    );

    let senders: Vec<U256> = [0, 4, 5]
        .iter()
        .map(|&i| Drips::squeezeStreamsCall::abi_decode(&plan.calls[i].data).unwrap().senderId)
        .collect();
    assert_eq!(senders, vec![U256::from(2), U256::from(1), U256::from(3)]);
}

#[tokio::test]
async fn test_auto_unwrap_collects_to_unwrapper() {
    let chain = MockChain::new();
    let mut config = base_config(vec![WETH]);
    config.should_auto_unwrap = true;

    let plan = plan_collection(&chain, &registry_with_unwrapper(), &config)
        .await
        .unwrap();

    assert_eq!(
        plan.function_names(),
        vec!["receiveStreams", "split", "collect", "unwrap"]
    );
    let collect = AddressDriver::collectCall::abi_decode(&plan.calls[2].data).unwrap();
    assert_eq!(collect.transferTo, UNWRAPPER);

    assert_eq!(plan.calls[3].to, UNWRAPPER);
    let unwrap = NativeTokenUnwrapper::unwrapCall::abi_decode(&plan.calls[3].data).unwrap();
    assert_eq!(unwrap.recipient, SIGNER);
}

#[tokio::test]
async fn test_auto_unwrap_without_unwrapper_fails_before_reads() {
    let chain = MockChain::new();
    let mut config = base_config(vec![WETH]);
    config.should_auto_unwrap = true;

    let err = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::UnwrapperNotConfigured(1)));
    assert_eq!(chain.read_count(), 0);
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_auto_unwrap_rejects_foreign_transfer_address() {
    let chain = MockChain::new();
    let mut config = base_config(vec![WETH]);
    config.should_auto_unwrap = true;
    config.transfer_to_address = Some(address!("00000000000000000000000000000000000000cc"));

    let err = plan_collection(&chain, &registry_with_unwrapper(), &config)
        .await
        .unwrap_err();

    match err {
        DripsError::TransferAddressMismatch { signer, .. } => assert_eq!(signer, SIGNER),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(chain.read_count(), 0);
}

#[tokio::test]
async fn test_auto_unwrap_accepts_signer_as_transfer_address() {
    let chain = MockChain::new();
    let mut config = base_config(vec![WETH]);
    config.should_auto_unwrap = true;
    config.transfer_to_address = Some(SIGNER);

    assert!(plan_collection(&chain, &registry_with_unwrapper(), &config).await.is_ok());
}

#[tokio::test]
async fn test_empty_token_list_fails_without_network() {
    let chain = MockChain::new().with_failing_reads();
    let config = base_config(Vec::new());

    let err = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::EmptyTokenList));
    assert_eq!(chain.read_count(), 0);
}

#[tokio::test]
async fn test_unsupported_chain_is_rejected() {
    let chain = MockChain::new().on_chain(31337);
    let config = base_config(vec![DAI]);

    let err = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::UnsupportedChain(31337)));
    assert_eq!(chain.read_count(), 0);
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let chain = MockChain::new().with_failing_reads();
    let config = base_config(vec![DAI]);

    let err = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::Chain(_)));
}

#[tokio::test]
async fn test_prepared_collection_is_one_batch_with_overrides() {
    let chain = MockChain::new();
    let mut config = base_config(vec![DAI]);
    config.batched_tx_overrides = Some(TxOverrides {
        gas_limit: Some(500_000),
        ..Default::default()
    });

    let tx = prepare_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap();

    assert_eq!(tx.to, mainnet_contracts().caller);
    assert_eq!(tx.abi_function_name, "callBatched");
    assert_eq!(tx.overrides.gas_limit, Some(500_000));

    let batch = Caller::callBatchedCall::abi_decode(&tx.data).unwrap();
    assert_eq!(batch.calls.len(), 3);
}

#[tokio::test]
async fn test_collect_sends_the_batch() {
    let chain = MockChain::new();
    let config = base_config(vec![DAI]);

    let pending = collect(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap();
    let receipt = pending.wait(1).await.unwrap();

    assert_eq!(chain.sent_functions(), vec!["callBatched"]);
    assert_ne!(receipt.tx_hash, TxHash::ZERO);
}

#[tokio::test]
async fn test_squeezes_for_other_tokens_are_ignored() {
    let chain = MockChain::new();
    let mut invalid = squeeze(WETH, 1);
    invalid.streams_history[0].receivers[0].config.amount_per_sec = U256::ZERO;

    let mut config = base_config(vec![DAI]);
    config.squeeze_args = vec![invalid.clone()];
    let plan = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap();
    assert_eq!(plan.function_names(), vec!["receiveStreams", "split", "collect"]);

    // The same squeeze is rejected once its token is collected.
    config.token_addresses.push(WETH);
    let err = plan_collection(&chain, &ContractRegistry::with_defaults(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, DripsError::Codec(_)));
}

//! Receiver resolution against a mock chain.

use alloy::primitives::{address, U256};

use drips_sdk::codec::account_id::address_driver_account_id;
use drips_sdk::receivers::{resolve_account_id, resolve_receivers, SdkSplitsReceiver};
use drips_sdk::registry::ContractRegistry;
use drips_sdk::DripsError;

mod common;

use common::{repo_account_id, MockChain};

fn registry() -> ContractRegistry {
    ContractRegistry::with_defaults()
}

#[tokio::test]
async fn test_project_resolves_through_repo_driver() {
    let chain = MockChain::new();
    let receiver = SdkSplitsReceiver::Project {
        url: "https://github.com/drips-network/app".into(),
        weight: 1,
    };

    let account_id = resolve_account_id(&chain, &registry(), &receiver)
        .await
        .unwrap();

    assert_eq!(account_id, repo_account_id(0, b"drips-network/app"));
    assert_eq!(chain.read_count(), 1);
}

#[tokio::test]
async fn test_known_ids_need_no_reads() {
    let chain = MockChain::new();
    let receiver = SdkSplitsReceiver::DripList {
        account_id: U256::from(99u64),
        weight: 10,
    };

    let account_id = resolve_account_id(&chain, &registry(), &receiver)
        .await
        .unwrap();

    assert_eq!(account_id, U256::from(99u64));
    assert_eq!(chain.read_count(), 0);
}

#[tokio::test]
async fn test_missing_project_url() {
    let chain = MockChain::new();
    let receiver = SdkSplitsReceiver::Project {
        url: String::new(),
        weight: 1,
    };

    let err = resolve_account_id(&chain, &registry(), &receiver)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DripsError::MissingReceiverField {
            receiver_type: "project",
            field: "url"
        }
    ));
}

#[tokio::test]
async fn test_unknown_type_is_unsupported() {
    let chain = MockChain::new();
    let receiver: SdkSplitsReceiver =
        serde_json::from_str(r#"{"type":"orcid","weight":5}"#).unwrap();

    let err = resolve_account_id(&chain, &registry(), &receiver)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::UnsupportedReceiverType));
}

#[tokio::test]
async fn test_list_is_resolved_and_sorted() {
    let chain = MockChain::new();
    let first = address!("00000000000000000000000000000000000000f0");
    let receivers: Vec<SdkSplitsReceiver> = serde_json::from_value(serde_json::json!([
        { "type": "address", "address": first, "weight": 400000 },
        { "type": "drip-list", "accountId": "0x1", "weight": 100000 },
        { "type": "project", "url": "https://github.com/foo/bar", "weight": 500000 },
    ]))
    .unwrap();

    let resolved = resolve_receivers(&chain, &registry(), &receivers)
        .await
        .unwrap();

    let ids: Vec<U256> = resolved.iter().map(|r| r.account_id).collect();
    let mut expected = vec![
        address_driver_account_id(first),
        U256::from(1u64),
        repo_account_id(0, b"foo/bar"),
    ];
    expected.sort();
    assert_eq!(ids, expected);
    assert_eq!(resolved.iter().map(|r| r.weight).sum::<u32>(), 1_000_000);
}

#[tokio::test]
async fn test_duplicate_receivers_are_rejected() {
    let chain = MockChain::new();
    let receivers = vec![
        SdkSplitsReceiver::SubList {
            account_id: U256::from(7u64),
            weight: 1,
        },
        SdkSplitsReceiver::SubList {
            account_id: U256::from(7u64),
            weight: 2,
        },
    ];

    let err = resolve_receivers(&chain, &registry(), &receivers)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::InvalidSplitsReceivers(_)));
}

#[tokio::test]
async fn test_zero_weight_is_rejected() {
    let chain = MockChain::new();
    let receivers = vec![SdkSplitsReceiver::EcosystemMainAccount {
        account_id: U256::from(3u64),
        weight: 0,
    }];

    let err = resolve_receivers(&chain, &registry(), &receivers)
        .await
        .unwrap_err();

    assert!(matches!(err, DripsError::InvalidSplitsReceivers(_)));
}

#[tokio::test]
async fn test_unsupported_chain_is_rejected_before_reads() {
    let chain = MockChain::new().on_chain(31337);
    let receivers = vec![SdkSplitsReceiver::Address {
        address: address!("00000000000000000000000000000000000000f0"),
        weight: 1,
    }];

    let err = resolve_receivers(&chain, &registry(), &receivers)
        .await
        .unwrap_err();
    assert!(matches!(err, DripsError::UnsupportedChain(31337)));

    let err = resolve_account_id(&chain, &registry(), &receivers[0])
        .await
        .unwrap_err();
    assert!(matches!(err, DripsError::UnsupportedChain(31337)));

    assert_eq!(chain.read_count(), 0);
}

//! Per-chain contract registry.
//!
//! The registry is an ordinary value built at startup (built-in defaults
//! plus configured chains) and passed to every entry point. Any chain ID not
//! present is unsupported.

use std::collections::BTreeMap;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::config::SdkConfig;
use crate::error::{DripsError, DripsResult};

/// Ethereum mainnet chain ID.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Addresses of the protocol contracts on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainContracts {
    pub drips: Address,
    pub caller: Address,
    pub address_driver: Address,
    pub nft_driver: Address,
    pub repo_driver: Address,
    /// Wrapped-native-token unwrapper; chains without one cannot auto-unwrap.
    #[serde(default)]
    pub native_token_unwrapper: Option<Address>,
    #[serde(default)]
    pub repo_deadline_driver: Option<Address>,
}

impl ChainContracts {
    /// Every configured address, labelled with its contract name.
    pub fn named_addresses(&self) -> Vec<(&'static str, Address)> {
        let mut named = vec![
            ("drips", self.drips),
            ("caller", self.caller),
            ("address_driver", self.address_driver),
            ("nft_driver", self.nft_driver),
            ("repo_driver", self.repo_driver),
        ];
        if let Some(unwrapper) = self.native_token_unwrapper {
            named.push(("native_token_unwrapper", unwrapper));
        }
        if let Some(driver) = self.repo_deadline_driver {
            named.push(("repo_deadline_driver", driver));
        }
        named
    }
}

/// Mapping from chain ID to contract addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRegistry {
    chains: BTreeMap<u64, ChainContracts>,
}

impl ContractRegistry {
    /// An empty registry; every chain is unsupported until inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in deployments.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(
            MAINNET_CHAIN_ID,
            ChainContracts {
                drips: address!("d0dd053392db676d57317cd4fe96fc2ccf42d0b4"),
                caller: address!("60f25ac5f289dc7f640f948521d486c964a248e5"),
                address_driver: address!("1455d9bd6b98f95dd8feb2b3d60ed825fcef0610"),
                nft_driver: address!("cf9c49b0962edb01cdaa5326299ba85d72405258"),
                repo_driver: address!("770023d55d09a9c110694827f1a6b32d5c2b373e"),
                native_token_unwrapper: None,
                repo_deadline_driver: None,
            },
        );
        registry
    }

    /// Built-in deployments overridden and extended by `config.chains`.
    pub fn from_config(config: &SdkConfig) -> Self {
        let mut registry = Self::with_defaults();
        for entry in &config.chains {
            registry.insert(entry.chain_id, entry.contracts.clone());
        }
        registry
    }

    /// Add or replace the contracts for `chain_id`.
    pub fn insert(&mut self, chain_id: u64, contracts: ChainContracts) {
        self.chains.insert(chain_id, contracts);
    }

    /// Contracts for `chain_id`, or [`DripsError::UnsupportedChain`].
    pub fn contracts_for(&self, chain_id: u64) -> DripsResult<&ChainContracts> {
        self.chains
            .get(&chain_id)
            .ok_or(DripsError::UnsupportedChain(chain_id))
    }

    /// Supported chain IDs, ascending.
    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainEntry;

    fn local_contracts() -> ChainContracts {
        ChainContracts {
            drips: Address::repeat_byte(1),
            caller: Address::repeat_byte(2),
            address_driver: Address::repeat_byte(3),
            nft_driver: Address::repeat_byte(4),
            repo_driver: Address::repeat_byte(5),
            native_token_unwrapper: Some(Address::repeat_byte(6)),
            repo_deadline_driver: None,
        }
    }

    #[test]
    fn test_unknown_chain_is_unsupported() {
        let registry = ContractRegistry::with_defaults();
        assert!(registry.contracts_for(MAINNET_CHAIN_ID).is_ok());
        assert!(matches!(
            registry.contracts_for(31337),
            Err(DripsError::UnsupportedChain(31337))
        ));
    }

    #[test]
    fn test_config_extends_defaults() {
        let mut config = SdkConfig::default();
        config.chains.push(ChainEntry {
            chain_id: 31337,
            contracts: local_contracts(),
        });

        let registry = ContractRegistry::from_config(&config);
        assert_eq!(registry.chain_ids().collect::<Vec<_>>(), vec![1, 31337]);
        assert_eq!(registry.contracts_for(31337).unwrap(), &local_contracts());
    }

    #[test]
    fn test_named_addresses_include_optional_contracts() {
        let names: Vec<_> = local_contracts()
            .named_addresses()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert!(names.contains(&"native_token_unwrapper"));
        assert!(!names.contains(&"repo_deadline_driver"));
    }
}

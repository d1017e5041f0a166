//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::registry::ChainContracts;

/// Root configuration for the SDK.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Per-chain contract addresses. Entries override the built-in
    /// defaults for the same chain ID.
    pub chains: Vec<ChainEntry>,

    /// Identity-claim workflow settings.
    pub claim: ClaimConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads.
    pub failover_urls: Vec<String>,

    /// Expected chain ID. When set, a client on any other chain is rejected.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a receipt after broadcasting, in seconds.
    pub receipt_timeout_secs: u64,

    /// Confirmations awaited for each sent transaction.
    pub confirmations: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: None,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 300,
            confirmations: 1,
        }
    }
}

/// Contract addresses for one chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainEntry {
    /// EIP-155 chain ID.
    pub chain_id: u64,

    #[serde(flatten)]
    pub contracts: ChainContracts,
}

/// ORCID claim workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Interval between ownership polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Ownership polling deadline, in seconds, measured from the first poll.
    pub timeout_secs: u64,

    /// Confirmations awaited for the claim and splits transactions.
    pub confirmations: u64,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3_000,
            timeout_secs: 120,
            confirmations: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: SdkConfig = toml::from_str("").unwrap();
        assert_eq!(config.claim.poll_interval_ms, 3_000);
        assert_eq!(config.claim.timeout_secs, 120);
        assert!(config.chains.is_empty());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_chain_entry_from_toml() {
        let config: SdkConfig = toml::from_str(
            r#"
            [rpc]
            rpc_url = "https://rpc.example.org"
            chain_id = 11155111

            [[chains]]
            chain_id = 11155111
            drips = "0x0000000000000000000000000000000000000001"
            caller = "0x0000000000000000000000000000000000000002"
            address_driver = "0x0000000000000000000000000000000000000003"
            nft_driver = "0x0000000000000000000000000000000000000004"
            repo_driver = "0x0000000000000000000000000000000000000005"
            native_token_unwrapper = "0x0000000000000000000000000000000000000006"
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.chain_id, Some(11155111));
        assert_eq!(config.chains.len(), 1);
        let entry = &config.chains[0];
        assert_eq!(entry.chain_id, 11155111);
        assert!(entry.contracts.native_token_unwrapper.is_some());
        assert!(entry.contracts.repo_deadline_driver.is_none());
    }
}

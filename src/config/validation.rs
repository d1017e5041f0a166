//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, URLs parse)
//! - Detect duplicate chain entries and zero contract addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SdkConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rpc.rpc_url `{0}` is not a valid URL")]
    InvalidRpcUrl(String),

    #[error("rpc.rpc_timeout_secs must be greater than zero")]
    ZeroRpcTimeout,

    #[error("chain {0} is configured more than once")]
    DuplicateChain(u64),

    #[error("chain {chain_id}: contract `{contract}` has the zero address")]
    ZeroContractAddress { chain_id: u64, contract: &'static str },

    #[error("claim.poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("claim.timeout_secs must be greater than zero")]
    ZeroClaimTimeout,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.rpc.rpc_url).is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.rpc.rpc_url.clone()));
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRpcTimeout);
    }

    let mut seen = HashSet::new();
    for entry in &config.chains {
        if !seen.insert(entry.chain_id) {
            errors.push(ValidationError::DuplicateChain(entry.chain_id));
        }
        for (contract, address) in entry.contracts.named_addresses() {
            if address.is_zero() {
                errors.push(ValidationError::ZeroContractAddress {
                    chain_id: entry.chain_id,
                    contract,
                });
            }
        }
    }

    if config.claim.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }
    if config.claim.timeout_secs == 0 {
        errors.push(ValidationError::ZeroClaimTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Receiver resolution.
//!
//! # Responsibilities
//! - Parse project URLs into `(forge, owner/repo)`
//! - Ask the drivers for deterministic account IDs (one read per receiver)
//! - Pass through receivers whose account ID is already known
//! - Validate weights and format lists for the Drips contract

use alloy::primitives::{Address, Bytes, U256};
use futures_util::future::try_join_all;
use url::Url;

use crate::chain::ReadClient;
use crate::contracts::{view_call, AddressDriver, Forge, RepoDriver, TOTAL_SPLITS_WEIGHT};
use crate::error::{DripsError, DripsResult};
use crate::receivers::types::{format_splits_receivers, OnChainSplitsReceiver, SdkSplitsReceiver};
use crate::registry::{ChainContracts, ContractRegistry};

/// A repository URL broken into the parts the RepoDriver hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUrl {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
}

impl ProjectUrl {
    /// The RepoDriver name, `owner/repo`.
    pub fn name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Parse `https://github.com/<owner>/<repo>`.
///
/// Only GitHub is accepted. A trailing `/` or `.git` suffix is tolerated;
/// queries, fragments and extra path segments are not.
pub fn parse_project_url(url: &str) -> DripsResult<ProjectUrl> {
    let invalid = |reason: &'static str| DripsError::InvalidProjectUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|_| invalid("not an absolute URL"))?;
    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(invalid("scheme must be http or https"));
    }
    let forge = match parsed.host_str() {
        Some("github.com") | Some("www.github.com") => Forge::GitHub,
        _ => return Err(invalid("only GitHub projects are supported")),
    };
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed"));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let &[owner, repo] = segments.as_slice() else {
        return Err(invalid("expected /<owner>/<repo>"));
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid(owner) || !valid(repo) {
        return Err(invalid("owner and repo may only contain letters, digits, '-', '_' and '.'"));
    }

    Ok(ProjectUrl {
        forge,
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// `AddressDriver.calcAccountId(address)`.
pub(crate) async fn calc_address_account_id<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    address: Address,
) -> DripsResult<U256> {
    let call = AddressDriver::calcAccountIdCall { addr: address };
    view_call(client, contracts.address_driver, &call).await
}

/// `RepoDriver.calcAccountId(forge, name)`.
pub(crate) async fn calc_project_account_id<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    forge: Forge,
    name: &str,
) -> DripsResult<U256> {
    let call = RepoDriver::calcAccountIdCall {
        forge: forge.as_u8(),
        name: Bytes::copy_from_slice(name.as_bytes()),
    };
    view_call(client, contracts.repo_driver, &call).await
}

/// Contracts for the chain `client` is connected to.
async fn contracts_for_client<'r, C: ReadClient>(
    client: &C,
    registry: &'r ContractRegistry,
) -> DripsResult<&'r ChainContracts> {
    let chain_id = client.chain_id().await?;
    registry.contracts_for(chain_id)
}

/// Resolve a receiver to its on-chain account ID.
///
/// Fails with [`DripsError::UnsupportedChain`] before any read when the
/// client's chain has no registry entry. Otherwise performs at most one
/// contract read: projects and addresses are computed by their drivers;
/// list and ecosystem receivers already carry their ID.
pub async fn resolve_account_id<C: ReadClient>(
    client: &C,
    registry: &ContractRegistry,
    receiver: &SdkSplitsReceiver,
) -> DripsResult<U256> {
    let contracts = contracts_for_client(client, registry).await?;
    account_id_on(client, contracts, receiver).await
}

/// Resolve a receiver and check its weight.
pub async fn resolve_receiver<C: ReadClient>(
    client: &C,
    registry: &ContractRegistry,
    receiver: &SdkSplitsReceiver,
) -> DripsResult<OnChainSplitsReceiver> {
    let contracts = contracts_for_client(client, registry).await?;
    receiver_on(client, contracts, receiver).await
}

/// Resolve a list of receivers and format it for the Drips contract.
///
/// Reads are issued concurrently; the first failure aborts the batch.
pub async fn resolve_receivers<C: ReadClient>(
    client: &C,
    registry: &ContractRegistry,
    receivers: &[SdkSplitsReceiver],
) -> DripsResult<Vec<OnChainSplitsReceiver>> {
    let contracts = contracts_for_client(client, registry).await?;
    receivers_on(client, contracts, receivers).await
}

/// [`resolve_account_id`] against contracts whose chain is already checked.
pub(crate) async fn account_id_on<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    receiver: &SdkSplitsReceiver,
) -> DripsResult<U256> {
    match receiver {
        SdkSplitsReceiver::Project { url, .. } => {
            if url.trim().is_empty() {
                return Err(DripsError::MissingReceiverField {
                    receiver_type: "project",
                    field: "url",
                });
            }
            let project = parse_project_url(url)?;
            calc_project_account_id(client, contracts, project.forge, &project.name()).await
        }
        SdkSplitsReceiver::Address { address, .. } => {
            calc_address_account_id(client, contracts, *address).await
        }
        SdkSplitsReceiver::DripList { account_id, .. } => known_account_id("drip-list", *account_id),
        SdkSplitsReceiver::SubList { account_id, .. } => known_account_id("sub-list", *account_id),
        SdkSplitsReceiver::EcosystemMainAccount { account_id, .. } => {
            known_account_id("ecosystem-main-account", *account_id)
        }
        SdkSplitsReceiver::Unsupported => Err(DripsError::UnsupportedReceiverType),
    }
}

fn known_account_id(receiver_type: &'static str, account_id: U256) -> DripsResult<U256> {
    if account_id.is_zero() {
        return Err(DripsError::MissingReceiverField {
            receiver_type,
            field: "accountId",
        });
    }
    Ok(account_id)
}

async fn receiver_on<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    receiver: &SdkSplitsReceiver,
) -> DripsResult<OnChainSplitsReceiver> {
    let account_id = account_id_on(client, contracts, receiver).await?;
    let weight = receiver.weight().ok_or(DripsError::UnsupportedReceiverType)?;

    if weight == 0 || weight > TOTAL_SPLITS_WEIGHT {
        return Err(DripsError::InvalidSplitsReceivers(format!(
            "{} receiver weight {} must be in 1..={}",
            receiver.kind(),
            weight,
            TOTAL_SPLITS_WEIGHT
        )));
    }

    Ok(OnChainSplitsReceiver { account_id, weight })
}

/// [`resolve_receivers`] against contracts whose chain is already checked.
pub(crate) async fn receivers_on<C: ReadClient>(
    client: &C,
    contracts: &ChainContracts,
    receivers: &[SdkSplitsReceiver],
) -> DripsResult<Vec<OnChainSplitsReceiver>> {
    let resolved = try_join_all(
        receivers
            .iter()
            .map(|receiver| receiver_on(client, contracts, receiver)),
    )
    .await?;

    tracing::debug!(count = resolved.len(), "Resolved splits receivers");
    format_splits_receivers(resolved)
}

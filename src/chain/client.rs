//! Alloy-backed implementations of the chain capabilities.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Execute read-only calls with per-request timeouts
//! - Sign and broadcast prepared transactions, then await receipts

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::signers::Signature;
use tokio::time::timeout;

use crate::chain::types::{ChainError, ChainResult, RpcConfig, TxReceipt};
use crate::chain::wallet::Wallet;
use crate::chain::{PendingTx, PreparedTx, ReadClient, WriteClient};
use crate::observability::metrics;

/// Read-only RPC client with failover support.
#[derive(Clone)]
pub struct RpcClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// Fails only if the primary URL cannot be parsed; an unreachable
    /// endpoint is reported on first use.
    pub async fn new(config: RpcConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Err(e @ ChainError::ChainMismatch { .. }) => return Err(e),
            // Unreachable endpoints are tolerated here; every `chain_id` call re-checks.
            Err(e) => {
                tracing::warn!(error = %e, "RPC client initialized but chain verification failed");
            }
            Ok(()) => {}
        }

        tracing::info!(rpc_url = %config.rpc_url, "RPC client initialized");
        Ok(client)
    }

    /// Verify the connected chain ID matches configuration, if one is set.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        if self.config.chain_id.is_none() {
            return Ok(());
        }
        self.chain_id().await.map(|_| ())
    }

    async fn fetch_chain_id(&self) -> ChainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    metrics::record_rpc_failure("eth_chainId");
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    metrics::record_rpc_failure("eth_chainId");
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

impl ReadClient for RpcClient {
    async fn call(&self, tx: &PreparedTx) -> ChainResult<Bytes> {
        let request = tx.to_request();
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.call(request.clone()).into_future();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    metrics::record_rpc_failure("eth_call");
                    tracing::warn!(
                        provider_idx = i,
                        function = %tx.abi_function_name,
                        error = %e,
                        "RPC error, trying next provider"
                    );
                }
                Err(_) => {
                    metrics::record_rpc_failure("eth_call");
                    tracing::warn!(provider_idx = i, function = %tx.abi_function_name, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc(format!(
            "All RPC providers failed to call {}",
            tx.abi_function_name
        )))
    }

    /// The connected chain ID, rejected if it differs from `rpc.chain_id`.
    async fn chain_id(&self) -> ChainResult<u64> {
        let actual = self.fetch_chain_id().await?;
        expect_chain(self.config.chain_id, actual)
    }
}

/// Accept `actual` unless an expected chain is configured and differs.
fn expect_chain(expected: Option<u64>, actual: u64) -> ChainResult<u64> {
    match expected {
        Some(expected) if expected != actual => Err(ChainError::ChainMismatch { expected, actual }),
        _ => Ok(actual),
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Signing client: reads through [`RpcClient`], writes through a wallet provider.
#[derive(Clone)]
pub struct SigningClient {
    reader: RpcClient,
    provider: Arc<dyn Provider + Send + Sync>,
    wallet: Wallet,
}

impl SigningClient {
    /// Create a signing client for `wallet` against the primary RPC URL.
    pub async fn new(config: RpcConfig, wallet: Wallet) -> ChainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(wallet.signer().clone()))
            .connect_http(url);

        let reader = RpcClient::new(config).await?;

        Ok(Self {
            reader,
            provider: Arc::new(provider),
            wallet,
        })
    }
}

impl ReadClient for SigningClient {
    async fn call(&self, tx: &PreparedTx) -> ChainResult<Bytes> {
        self.reader.call(tx).await
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        self.reader.chain_id().await
    }
}

impl WriteClient for SigningClient {
    type Pending = AlloyPendingTx;

    async fn address(&self) -> ChainResult<Address> {
        Ok(self.wallet.address())
    }

    async fn send_tx(&self, tx: PreparedTx) -> ChainResult<AlloyPendingTx> {
        let request = tx.to_request().with_from(self.wallet.address());
        let timeout_secs = self.reader.config().rpc_timeout_secs;

        let pending = timeout(Duration::from_secs(timeout_secs), self.provider.send_transaction(request))
            .await
            .map_err(|_| ChainError::Timeout(timeout_secs))?
            .map_err(|e| {
                metrics::record_rpc_failure("eth_sendTransaction");
                ChainError::Rpc(format!("Failed to send {}: {}", tx.abi_function_name, e))
            })?;

        tracing::info!(
            tx_hash = %pending.tx_hash(),
            function = %tx.abi_function_name,
            to = %tx.to,
            "Transaction broadcast"
        );

        Ok(AlloyPendingTx {
            inner: pending,
            receipt_timeout: Duration::from_secs(self.reader.config().receipt_timeout_secs),
        })
    }

    async fn sign_message(&self, message: &[u8]) -> ChainResult<Signature> {
        self.wallet.sign_message(message).await
    }
}

impl std::fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningClient")
            .field("reader", &self.reader)
            .field("address", &self.wallet.address())
            .finish()
    }
}

/// A broadcast transaction awaiting its receipt.
pub struct AlloyPendingTx {
    inner: PendingTransactionBuilder<Ethereum>,
    receipt_timeout: Duration,
}

impl PendingTx for AlloyPendingTx {
    fn hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn wait(self, confirmations: u64) -> ChainResult<TxReceipt> {
        let tx_hash = self.hash();
        let receipt = self
            .inner
            .with_required_confirmations(confirmations)
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| ChainError::MissingReceipt {
                tx_hash,
                reason: e.to_string(),
            })?;

        if !receipt.status() {
            return Err(ChainError::Reverted(tx_hash));
        }

        tracing::debug!(tx_hash = %tx_hash, block_number = ?receipt.block_number, "Transaction confirmed");
        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.block_number,
        })
    }
}

//! Ethereum RPC client.

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, TxHash},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::{AppError, Result};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// Node operations used by a contract session.
///
/// Implemented over JSON-RPC by [`EthereumClient`]; tests substitute an
/// in-memory chain. Errors from the node are surfaced as-is.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Receipt type returned once a transaction is mined.
    type Receipt: Send;

    /// Chain identifier of the connected network.
    async fn chain_id(&self) -> Result<u64>;

    /// Number of transactions sent from `address` (its next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Execute a read-only call against the latest state.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes>;

    /// Submit a signed, EIP-2718 encoded transaction and return its hash.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash>;

    /// Fetch the receipt for `hash`, or `None` while it is still pending.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Self::Receipt>>;
}

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = ProviderBuilder::new().connect_http(url).root().clone();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url: rpc_url.to_string(),
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    /// Get the RPC URL this client was created with.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    type Receipt = TransactionReceipt;

    /// Get the chain ID (fetches from network on first call).
    async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                tracing::info!(chain_id = chain_id, rpc_url = %self.rpc_url, "Connected to Ethereum node");
                Ok(chain_id)
            })
            .await
            .copied()
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let count = self.provider.get_transaction_count(address).await?;
        Ok(count)
    }

    async fn gas_price(&self) -> Result<u128> {
        let gas_price = self.provider.get_gas_price().await?;
        Ok(gas_price)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        let result = self.provider.call(tx).await?;
        Ok(result)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;

        if let Some(receipt) = &receipt {
            if !receipt.status() {
                tracing::warn!(
                    tx_hash = %hash,
                    block = ?receipt.block_number(),
                    "Transaction mined but execution reverted"
                );
            }
        }

        Ok(receipt)
    }
}

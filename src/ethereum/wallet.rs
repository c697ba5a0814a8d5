//! Wallet management.

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, B256},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};

use crate::error::{AppError, Result};

/// Wallet manager for transaction signing.
///
/// The sending address is always derived from the key, never supplied.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let bytes: B256 = key.parse().map_err(|e: alloy::hex::FromHexError| {
            AppError::Wallet(format!("Private key is not 32 bytes of hex: {}", e))
        })?;

        if bytes == B256::ZERO {
            return Err(AppError::Wallet(
                "Private key is the all-zero placeholder; supply a real key".into(),
            ));
        }

        let signer = PrivateKeySigner::from_bytes(&bytes)
            .map_err(|e| AppError::Wallet(format!("Invalid private key: {}", e)))?;
        let address = signer.address();

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the signer for transaction signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Sign a fully populated request and return the EIP-2718 encoded raw transaction.
    ///
    /// The request's `from` is overwritten with the wallet address.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes> {
        let tx = tx.with_from(self.address);
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx.build(&wallet).await?;

        tracing::debug!(tx_hash = %envelope.tx_hash(), "Transaction signed");

        Ok(envelope.encoded_2718().into())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}

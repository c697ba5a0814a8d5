//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::{env, time::Duration};

use crate::{
    error::AppError,
    ethereum::constants::{DEFAULT_GAS_LIMIT, DEFAULT_RECEIPT_POLL_INTERVAL},
};

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the sending account (hex string, 0x prefix optional).
    pub private_key: String,
    /// Address of the bound contract.
    pub contract_address: String,
    /// Path to the contract's JSON ABI.
    pub abi_path: String,
    /// Fixed gas limit attached to every transaction.
    pub gas_limit: u64,
    /// Delay between receipt polls while waiting for a transaction to be mined.
    pub receipt_poll_interval: Duration,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    /// - `ETHEREUM_PRIVATE_KEY`: Private key of the sending account (hex)
    /// - `CONTRACT_ADDRESS`: Address of the contract to bind
    /// - `CONTRACT_ABI_PATH`: Path to the contract's JSON ABI file
    ///
    /// Optional environment variables:
    /// - `CONTRACT_GAS_LIMIT`: Gas limit per transaction (default: 500000)
    /// - `RECEIPT_POLL_INTERVAL_MS`: Receipt polling interval (default: 500)
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = required("ETHEREUM_RPC_URL")?;
        let private_key = required("ETHEREUM_PRIVATE_KEY")?;
        let contract_address = required("CONTRACT_ADDRESS")?;
        let abi_path = required("CONTRACT_ABI_PATH")?;

        let gas_limit = match env::var("CONTRACT_GAS_LIMIT") {
            Ok(v) => v.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid CONTRACT_GAS_LIMIT '{}': {}", v, e))
            })?,
            Err(_) => DEFAULT_GAS_LIMIT,
        };

        let receipt_poll_interval = match env::var("RECEIPT_POLL_INTERVAL_MS") {
            Ok(v) => Duration::from_millis(v.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid RECEIPT_POLL_INTERVAL_MS '{}': {}", v, e))
            })?),
            Err(_) => DEFAULT_RECEIPT_POLL_INTERVAL,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            rpc_url,
            private_key,
            contract_address,
            abi_path,
            gas_limit,
            receipt_poll_interval,
            log_level,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("abi_path", &self.abi_path)
            .field("gas_limit", &self.gas_limit)
            .field("receipt_poll_interval", &self.receipt_poll_interval)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

fn required(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Config(format!("{} environment variable not set", name))),
    }
}

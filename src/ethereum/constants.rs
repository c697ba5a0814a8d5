//! Ethereum session constants.

use std::time::Duration;

/// Gas limit attached to every submitted transaction unless configured otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;

/// Delay between `eth_getTransactionReceipt` polls while waiting for inclusion.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Local development chain ID used by Anvil and Hardhat.
pub const DEV_CHAIN_ID: u64 = 31337;

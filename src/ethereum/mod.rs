//! Ethereum interaction module.
//!
//! Contains the Ethereum client, wallet management, and runtime ABI handling.

pub mod abi;
pub mod client;
pub mod constants;
pub mod wallet;

pub use abi::ContractAbi;
pub use client::{ChainClient, EthereumClient, HttpProvider};
pub use wallet::WalletManager;

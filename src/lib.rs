//! Contract Session Library
//!
//! Binds one signing account and one deployed contract to an Ethereum node and
//! exposes two operations: `transact` (sign, submit and wait for a receipt) and
//! `call` (read-only query). An MCP server wraps a session as tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use alloy::{dyn_abi::DynSolValue, primitives::U256};
//! use contract_session::{Config, ContractSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut session = ContractSession::from_config(&config)?;
//!
//!     let decimals = session.call("decimals", &[]).await?;
//!     let receipt = session
//!         .transact(
//!             "transfer",
//!             &[DynSolValue::Address(recipient), DynSolValue::Uint(U256::from(1), 256)],
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod session;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use mcp::ContractSessionServer;
pub use session::ContractSession;

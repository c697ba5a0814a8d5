//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions. Errors raised
//! by the underlying client library are wrapped with their message intact.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Wallet and signing errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// ABI loading, encoding or decoding errors.
    #[error("ABI error: {0}")]
    Abi(String),

    /// The contract ABI has no function with this name or signature.
    #[error("Unknown contract method: {0}")]
    UnknownMethod(String),

    /// Several overloads match the call and none can be preferred.
    #[error("Ambiguous contract method '{method}': {candidates} overloads take {args} arguments")]
    AmbiguousMethod { method: String, candidates: usize, args: usize },

    /// Argument count does not match the function's inputs.
    #[error("Argument mismatch for '{method}': expected {expected}, got {actual}")]
    ArgumentMismatch { method: String, expected: usize, actual: usize },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::dyn_abi::Error> for AppError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<alloy::network::TransactionBuilderError<alloy::network::Ethereum>> for AppError {
    fn from(err: alloy::network::TransactionBuilderError<alloy::network::Ethereum>) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::primitives::AddressError> for AppError {
    fn from(err: alloy::primitives::AddressError) -> Self {
        AppError::InvalidAddress(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidAddress(_)
            | AppError::Abi(_)
            | AppError::UnknownMethod(_)
            | AppError::AmbiguousMethod { .. }
            | AppError::ArgumentMismatch { .. }
            | AppError::Parse(_) => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) => McpError::invalid_request(err.to_string(), None),
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

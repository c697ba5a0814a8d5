//! Contract call and session types.

use alloy::{dyn_abi::DynSolValue, hex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a read-only contract call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOutput {
    /// Contract address (checksummed).
    pub contract: String,
    /// Method that was called.
    pub method: String,
    /// Decoded return values, in declaration order.
    pub values: Vec<Value>,
}

impl CallOutput {
    /// Build a call output from decoded ABI values.
    pub fn new(contract: String, method: String, values: &[DynSolValue]) -> Self {
        Self { contract, method, values: values.iter().map(sol_value_to_json).collect() }
    }
}

/// Static description of a contract session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Sending account (checksummed).
    pub sender: String,
    /// Bound contract (checksummed).
    pub contract: String,
    /// Chain ID reported by the node.
    pub chain_id: u64,
    /// Gas limit attached to every transaction.
    pub gas_limit: u64,
    /// Hash of the most recently submitted transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction: Option<String>,
    /// Function signatures available on the contract.
    pub functions: Vec<String>,
}

/// Convert a decoded ABI value into JSON.
///
/// Integers become decimal strings so that 256-bit values survive; byte
/// values become 0x-prefixed hex; arrays and tuples become JSON arrays.
pub fn sol_value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(hex::encode_prefixed(&word[..*size]))
        }
        DynSolValue::Address(addr) => Value::String(addr.to_checksum(None)),
        DynSolValue::Function(f) => Value::String(hex::encode_prefixed(f.as_slice())),
        DynSolValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(sol_value_to_json).collect())
        }
        #[allow(unreachable_patterns)]
        other => Value::String(format!("{:?}", other)),
    }
}

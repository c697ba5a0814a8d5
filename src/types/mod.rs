//! Type definitions module.
//!
//! Contains the JSON views returned by the MCP tools.

pub mod call;

pub use call::*;

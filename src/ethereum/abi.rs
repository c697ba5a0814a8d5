//! Contract ABI handling.
//!
//! Resolves functions by name, encodes calldata and decodes call output using
//! a JSON ABI supplied at runtime.

use std::path::Path;

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier},
    json_abi::{Function, JsonAbi},
    primitives::Bytes,
};

use crate::error::{AppError, Result};

/// A contract's JSON ABI with name-based function lookup.
#[derive(Debug, Clone)]
pub struct ContractAbi {
    abi: JsonAbi,
}

impl ContractAbi {
    /// Parse an ABI from its JSON representation.
    ///
    /// Accepts either a bare ABI array or a compiler artifact carrying an `abi` field.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let value = match value {
            serde_json::Value::Object(mut obj) if obj.contains_key("abi") => {
                obj.remove("abi").unwrap_or_default()
            }
            other => other,
        };

        let abi: JsonAbi =
            serde_json::from_value(value).map_err(|e| AppError::Abi(e.to_string()))?;

        Ok(Self { abi })
    }

    /// Load an ABI from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read ABI file {}: {}", path.display(), e))
        })?;

        let abi = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            functions = abi.abi.functions.len(),
            "Contract ABI loaded"
        );

        Ok(abi)
    }

    /// Get the underlying ABI.
    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Canonical signatures (`name(type,...)`) of every function, sorted.
    pub fn function_signatures(&self) -> Vec<String> {
        let mut sigs: Vec<String> = self.abi.functions().map(|f| f.signature()).collect();
        sigs.sort();
        sigs
    }

    /// Resolve a function by name or full signature for a given argument count.
    ///
    /// `method` may be a plain name (`transfer`) or a signature
    /// (`transfer(address,uint256)`, whitespace ignored). Plain names among
    /// overloads pick the single overload taking `arg_count` inputs.
    pub fn function(&self, method: &str, arg_count: usize) -> Result<&Function> {
        if method.contains('(') {
            let wanted: String = method.chars().filter(|c| !c.is_whitespace()).collect();
            let name = wanted.split('(').next().unwrap_or_default();
            return self
                .abi
                .function(name)
                .and_then(|overloads| overloads.iter().find(|f| f.signature() == wanted))
                .ok_or_else(|| AppError::UnknownMethod(method.to_string()));
        }

        let overloads = self
            .abi
            .function(method)
            .ok_or_else(|| AppError::UnknownMethod(method.to_string()))?;

        if let [only] = overloads.as_slice() {
            return Ok(only);
        }

        let mut matching = overloads.iter().filter(|f| f.inputs.len() == arg_count);
        match (matching.next(), matching.next()) {
            (Some(f), None) => Ok(f),
            (None, _) => Err(AppError::UnknownMethod(format!(
                "{} (no overload takes {} arguments)",
                method, arg_count
            ))),
            (Some(_), Some(_)) => Err(AppError::AmbiguousMethod {
                method: method.to_string(),
                candidates: overloads.iter().filter(|f| f.inputs.len() == arg_count).count(),
                args: arg_count,
            }),
        }
    }

    /// Encode a call to `method` with typed arguments into calldata.
    pub fn encode_call(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = self.function(method, args.len())?;
        check_arity(function, args.len())?;

        let data = function.abi_encode_input(args)?;
        Ok(data.into())
    }

    /// Coerce textual arguments into ABI values using the function's input types.
    pub fn parse_args(&self, method: &str, args: &[String]) -> Result<Vec<DynSolValue>> {
        let function = self.function(method, args.len())?;
        check_arity(function, args.len())?;

        function
            .inputs
            .iter()
            .zip(args)
            .map(|(param, raw)| {
                let ty: DynSolType = param.resolve()?;
                ty.coerce_str(raw).map_err(|e| {
                    AppError::Parse(format!(
                        "argument '{}' of {}: cannot read '{}' as {}: {}",
                        param.name, function.name, raw, param.ty, e
                    ))
                })
            })
            .collect()
    }

    /// Decode the return data of a call to `method`.
    pub fn decode_output(
        &self,
        method: &str,
        arg_count: usize,
        data: &[u8],
    ) -> Result<Vec<DynSolValue>> {
        let function = self.function(method, arg_count)?;
        Ok(function.abi_decode_output(data)?)
    }
}

fn check_arity(function: &Function, actual: usize) -> Result<()> {
    if function.inputs.len() != actual {
        return Err(AppError::ArgumentMismatch {
            method: function.name.clone(),
            expected: function.inputs.len(),
            actual,
        });
    }
    Ok(())
}

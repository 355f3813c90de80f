//! ABI selection and loading
//!
//! Built-in fragments cover ERC-20 tokens and the classic "simple storage"
//! contract. Anything else falls back to a single-function fragment named
//! after the requested function, declared to return one `uint256`. Calling
//! a function with a different return shape through the fallback fails to
//! decode; pass an ABI file instead.

mod fragments;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use alloy_json_abi::JsonAbi;
use thiserror::Error;

pub use fragments::{ERC20_ABI, FUNCTION_PLACEHOLDER, GENERIC_FALLBACK_ABI, SIMPLE_STORAGE_ABI};

/// Contract type tag selecting a built-in ABI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    Erc20,
    Storage,
    Generic,
}

impl ContractKind {
    /// Map a tag to a kind. Unknown tags, including the empty string, are generic.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "erc20" => ContractKind::Erc20,
            "storage" => ContractKind::Storage,
            _ => ContractKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::Erc20 => "erc20",
            ContractKind::Storage => "storage",
            ContractKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the ABI text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiSource {
    Builtin(ContractKind),
    File(PathBuf),
}

impl fmt::Display for AbiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiSource::Builtin(kind) => write!(f, "built-in {} ABI", kind),
            AbiSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Failed to read ABI file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse ABI: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to parse ABI: expected a JSON array or an object with an \"abi\" field")]
    MissingAbi,
}

/// ABI fragment text for a contract kind.
///
/// For the generic kind the placeholder is replaced by `function`.
pub fn select_abi(kind: ContractKind, function: &str) -> String {
    match kind {
        ContractKind::Erc20 => ERC20_ABI.to_string(),
        ContractKind::Storage => SIMPLE_STORAGE_ABI.to_string(),
        ContractKind::Generic => GENERIC_FALLBACK_ABI.replacen(FUNCTION_PLACEHOLDER, function, 1),
    }
}

/// Read an ABI file verbatim
pub fn load_abi_file(path: &Path) -> Result<String, AbiError> {
    fs::read_to_string(path).map_err(|source| AbiError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the ABI text: a file overrides the contract kind entirely.
pub fn resolve_abi(
    abi_file: Option<&Path>,
    kind: ContractKind,
    function: &str,
) -> Result<(String, AbiSource), AbiError> {
    match abi_file {
        Some(path) => Ok((load_abi_file(path)?, AbiSource::File(path.to_path_buf()))),
        None => Ok((select_abi(kind, function), AbiSource::Builtin(kind))),
    }
}

/// Parse ABI JSON.
///
/// Accepts a bare ABI array or a compiler artifact (Foundry `out/`,
/// Hardhat `artifacts/`) carrying the array under `"abi"`.
pub fn parse_abi(text: &str) -> Result<JsonAbi, AbiError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let abi_value = if value.is_array() {
        value
    } else if let Some(abi) = value.get("abi") {
        abi.clone()
    } else {
        return Err(AbiError::MissingAbi);
    };

    Ok(serde_json::from_value(abi_value)?)
}

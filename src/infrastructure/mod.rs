//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based Ethereum provider implementation
//! - Contract binding that encodes calls and decodes results with alloy-dyn-abi

pub mod abi;
pub mod ethereum;

pub use abi::{CallError, GenericContract};
pub use ethereum::{create_provider, EthereumProvider, ProviderConfig};

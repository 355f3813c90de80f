//! Domain layer: ABI selection, address validation and argument coercion
//!
//! Nothing here touches the network.

pub mod abi;
pub mod address;
pub mod args;

pub use abi::{AbiError, AbiSource, ContractKind};
pub use address::{checksummed, parse_address};
pub use args::{coerce_args, ArgError, CallArg};

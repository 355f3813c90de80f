//! ABI infrastructure - Alloy-based contract binding

mod contract;

pub use contract::{CallError, GenericContract};

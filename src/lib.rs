//! Call a read-only function on an Ethereum contract and print the decoded
//! result.
//!
//! The ABI comes from a built-in fragment (`erc20`, `storage`, or a generic
//! single-`uint256` fallback) or from a file. Arguments are typed by sniffing
//! each literal: address, hex integer, decimal integer, then string.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod output;

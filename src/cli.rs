//! Command-line flags and request validation
//!
//! Flags may be written with one dash (`-contract=0x...`) as well as the
//! usual two; [`normalize_flags`] rewrites the single-dash spelling before
//! clap sees it.

use std::ffi::OsString;
use std::path::PathBuf;

use alloy_primitives::Address;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use thiserror::Error;

use crate::domain::{parse_address, ContractKind};

/// Long flag names accepted with a single leading dash
const LONG_FLAGS: &[&str] = &[
    "contract", "function", "rpc", "type", "abi", "args", "convert", "verbose", "help", "version",
];

const EXAMPLES: &str = "\
Examples:
  Call a function without arguments:
    viewcall -contract=0x123... -function=totalSupply -type=erc20

  Call a function with an address argument:
    viewcall -contract=0x123... -function=balanceOf -type=erc20 -args=0x456...

  Call a function and convert result to decimal:
    viewcall -contract=0x123... -function=balanceOf -type=erc20 -args=0x456... -convert";

#[derive(Debug, Parser)]
#[command(
    name = "viewcall",
    version,
    about = "Call a read-only function on an Ethereum contract and print the result",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Ethereum smart contract address (required)
    #[arg(long, value_name = "ADDRESS")]
    pub contract: Option<String>,

    /// Smart contract function name to call (required)
    #[arg(long, value_name = "NAME")]
    pub function: Option<String>,

    /// Ethereum RPC URL, IPC path or configured endpoint name
    /// [default: config file `rpc`, else https://mainnet.infura.io/v3/YOUR_INFURA_PROJECT_ID]
    #[arg(long, env = "ETH_RPC_URL", value_name = "URL")]
    pub rpc: Option<String>,

    /// Contract type (erc20, storage, generic)
    #[arg(long = "type", value_name = "TYPE", default_value = "generic")]
    pub contract_type: String,

    /// Path to ABI JSON file (overrides --type)
    #[arg(long, value_name = "PATH")]
    pub abi: Option<PathBuf>,

    /// Function arguments (comma separated)
    #[arg(long, value_name = "ARGS", default_value = "", allow_hyphen_values = true)]
    pub args: String,

    /// Convert integer results to decimal using a 10^18 denominator (for tokens)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub convert: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// A validated invocation, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub contract: Address,
    pub function: String,
    pub kind: ContractKind,
    pub abi_file: Option<PathBuf>,
    pub args: String,
    pub rpc: Option<String>,
    pub convert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Contract address is required")]
    MissingContract,
    #[error("Function name is required")]
    MissingFunction,
    #[error("Invalid contract address format: {0}")]
    InvalidAddress(String),
}

impl UsageError {
    /// Missing flags are followed by the usage text; a bad address is not
    pub fn shows_usage(&self) -> bool {
        !matches!(self, UsageError::InvalidAddress(_))
    }
}

impl Args {
    /// Validate required flags and the contract address
    pub fn into_request(self) -> Result<InvocationRequest, UsageError> {
        let contract = self
            .contract
            .filter(|s| !s.is_empty())
            .ok_or(UsageError::MissingContract)?;
        let function = self
            .function
            .filter(|s| !s.is_empty())
            .ok_or(UsageError::MissingFunction)?;
        let address =
            parse_address(&contract).ok_or_else(|| UsageError::InvalidAddress(contract.clone()))?;

        Ok(InvocationRequest {
            contract: address,
            function,
            kind: ContractKind::parse(&self.contract_type),
            abi_file: self.abi,
            args: self.args,
            rpc: self.rpc,
            convert: self.convert,
        })
    }
}

/// Print the full help text to stderr
pub fn print_usage() {
    eprintln!("{}", Args::command().render_help());
}

/// Rewrite `-name[=value]` to `--name[=value]` for known long flags.
///
/// The program name and everything after `--` are left untouched.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (position, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if position == 0 || passthrough {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        match arg.to_str().and_then(single_dash_long_flag) {
            Some(rewritten) => normalized.push(rewritten.into()),
            None => normalized.push(arg),
        }
    }

    normalized
}

fn single_dash_long_flag(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LONG_FLAGS.contains(&name).then(|| format!("-{}", arg))
}

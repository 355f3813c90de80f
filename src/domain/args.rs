//! Argument coercion: comma-separated literals to typed call arguments

use std::fmt;

use alloy_primitives::{Address, Sign, I256, U256};
use thiserror::Error;

use super::address::{checksummed, parse_address};

/// A typed call argument sniffed from a literal token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(Address),
    /// Non-negative integer
    Uint(U256),
    /// Negative integer
    Int(I256),
    String(String),
}

impl fmt::Display for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Address(addr) => write!(f, "address {}", checksummed(addr)),
            CallArg::Uint(value) => write!(f, "integer {}", value),
            CallArg::Int(value) => write!(f, "integer {}", value),
            CallArg::String(s) => write!(f, "string {:?}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("Failed to parse hex argument: {0}")]
    InvalidHex(String),
    #[error("integer argument does not fit in 256 bits: {0}")]
    Overflow(String),
}

/// Coerce a comma-separated argument string.
///
/// Each token is trimmed; empty tokens are skipped, so an empty string
/// yields no arguments. Order is preserved.
pub fn coerce_args(raw: &str) -> Result<Vec<CallArg>, ArgError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(coerce_arg)
        .collect()
}

/// Coerce a single token.
///
/// Tried in order: hex address, `0x`-prefixed base-16 integer (failure is an
/// error, never a string), base-10 integer, verbatim string. Both integer
/// forms take an optional sign, after the `0x` for hex (`0x-ff` is -255).
pub fn coerce_arg(token: &str) -> Result<CallArg, ArgError> {
    if let Some(address) = parse_address(token) {
        return Ok(CallArg::Address(address));
    }

    if let Some(rest) = token.strip_prefix("0x") {
        return parse_hex_integer(token, rest);
    }

    match parse_decimal_integer(token) {
        Some(result) => result,
        None => Ok(CallArg::String(token.to_string())),
    }
}

fn parse_hex_integer(token: &str, rest: &str) -> Result<CallArg, ArgError> {
    let (negative, digits) = split_sign(rest);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ArgError::InvalidHex(token.to_string()));
    }
    let magnitude =
        U256::from_str_radix(digits, 16).map_err(|_| ArgError::Overflow(token.to_string()))?;
    signed(token, negative, magnitude)
}

/// Returns `None` when the token is not a decimal number at all.
fn parse_decimal_integer(token: &str) -> Option<Result<CallArg, ArgError>> {
    let (negative, digits) = split_sign(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(
        U256::from_str_radix(digits, 10)
            .map_err(|_| ArgError::Overflow(token.to_string()))
            .and_then(|magnitude| signed(token, negative, magnitude)),
    )
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

/// Non-negative values (negative zero included) stay unsigned
fn signed(token: &str, negative: bool, magnitude: U256) -> Result<CallArg, ArgError> {
    if !negative || magnitude.is_zero() {
        return Ok(CallArg::Uint(magnitude));
    }
    I256::checked_from_sign_and_abs(Sign::Negative, magnitude)
        .map(CallArg::Int)
        .ok_or_else(|| ArgError::Overflow(token.to_string()))
}

//! Result formatting
//!
//! One line per decoded value, prefixed by its position. Integers can be
//! rescaled by 10^18 for token amounts.

use std::io::{self, Write};

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;

use crate::domain::checksummed;

/// Indent that aligns the rescaled line under the value after `Result[i]: `
const CONVERTED_INDENT: &str = "           ";

/// 10^18, the usual ERC-20 `decimals`
pub fn wei_per_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Render `value / 10^18` as a decimal, trailing fractional zeros stripped
pub fn format_units(value: U256) -> String {
    let unit = wei_per_ether();
    let integer = value / unit;
    let remainder = value % unit;

    let fraction = format!("{:0>18}", remainder.to_string());
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Format one decoded value. Integers with `convert` set may take two lines.
pub fn format_value(index: usize, value: &DynSolValue, convert: bool) -> Vec<String> {
    let prefix = format!("Result[{}]: ", index);

    match value {
        DynSolValue::Uint(u, _) => {
            let mut lines = vec![format!("{}{} (big.Int)", prefix, u)];
            if convert && !u.is_zero() {
                lines.push(converted_line(*u));
            }
            lines
        }
        DynSolValue::Int(i, _) => {
            let mut lines = vec![format!("{}{} (big.Int)", prefix, i)];
            if convert && i.is_positive() {
                lines.push(converted_line(i.into_raw()));
            }
            lines
        }
        DynSolValue::String(s) => vec![format!("{}{} (string)", prefix, s)],
        DynSolValue::Bytes(bytes) => vec![format!("{}0x{} (bytes)", prefix, hex::encode(bytes))],
        DynSolValue::Address(addr) => vec![format!("{}{} (address)", prefix, checksummed(addr))],
        DynSolValue::Bool(b) => vec![format!("{}{} (bool)", prefix, b)],
        other => {
            let type_name = other
                .as_type()
                .map(|ty| ty.sol_type_name().into_owned())
                .unwrap_or_else(|| "unknown".to_string());
            vec![format!("{}{} (type: {})", prefix, render(other), type_name)]
        }
    }
}

fn converted_line(value: U256) -> String {
    format!("{}= {} (decimal)", CONVERTED_INDENT, format_units(value))
}

/// Format every value in order
pub fn format_results(values: &[DynSolValue], convert: bool) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .flat_map(|(index, value)| format_value(index, value, convert))
        .collect()
}

/// Write formatted results, one per line
pub fn write_results<W: Write>(out: &mut W, values: &[DynSolValue], convert: bool) -> io::Result<()> {
    for line in format_results(values, convert) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Generic rendering for composite and fixed-size values
fn render(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => checksummed(addr),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let items: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(render).collect();
            format!("({})", items.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

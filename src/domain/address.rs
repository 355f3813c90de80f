//! Hex address validation

use std::str::FromStr;

use alloy_primitives::Address;

/// Parse a 20-byte hex address.
///
/// Accepts an optional `0x`/`0X` prefix and exactly 40 hex digits in any
/// case. The checksum is not enforced, so all-lowercase and all-uppercase
/// inputs are valid.
pub fn parse_address(input: &str) -> Option<Address> {
    let payload = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Address::from_str(payload).ok()
}

/// EIP-55 checksummed form of an address
pub fn checksummed(address: &Address) -> String {
    address.to_checksum(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_with_and_without_prefix() {
        let with_prefix = parse_address("0x3EF98543F9772DC959255545B717a61D408e7b61").unwrap();
        let without_prefix = parse_address("3ef98543f9772dc959255545b717a61d408e7b61").unwrap();
        let upper_prefix = parse_address("0X3EF98543F9772DC959255545B717A61D408E7B61").unwrap();
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix, upper_prefix);
    }

    #[test]
    fn test_parse_address_rejects_bad_input() {
        assert!(parse_address("").is_none());
        assert!(parse_address("0x").is_none());
        assert!(parse_address("0x1234").is_none());
        // 41 digits
        assert!(parse_address("0x3EF98543F9772DC959255545B717a61D408e7b611").is_none());
        // non-hex character
        assert!(parse_address("0x3EF98543F9772DC959255545B717a61D408e7bZZ").is_none());
    }

    #[test]
    fn test_checksummed() {
        let addr = parse_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(
            checksummed(&addr),
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );
    }
}

//! Big integer helpers shared by the per-algorithm key types

use keyseal_crypto::BigUint;

use crate::error::{Error, Result};

/// Uppercase hex without leading zeros (`"0"` for zero)
pub fn bn_to_hex(value: &BigUint) -> String {
    value.to_str_radix(16).to_uppercase()
}

/// Parse a hex big integer; an optional `0x` prefix and surrounding
/// whitespace are accepted
pub fn bn_from_hex(name: &'static str, hex: &str) -> Result<BigUint> {
    let trimmed = hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(Error::invalid(name, "empty hex value"));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::invalid(name, format!("not a hex integer: {}", hex)))
}

/// Parse an optional field
pub fn opt_bn(name: &'static str, hex: Option<&String>) -> Result<Option<BigUint>> {
    hex.map(|h| bn_from_hex(name, h)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let value = BigUint::from(0xdead_beefu32);
        assert_eq!(bn_to_hex(&value), "DEADBEEF");
        assert_eq!(bn_from_hex("x", "DEADBEEF").unwrap(), value);
        assert_eq!(bn_from_hex("x", "0xdeadbeef").unwrap(), value);
        assert_eq!(bn_to_hex(&BigUint::from(0u32)), "0");
    }

    #[test]
    fn test_bad_hex() {
        assert!(matches!(
            bn_from_hex("p", "xyz"),
            Err(Error::InvalidParameter { name: "p", .. })
        ));
        assert!(bn_from_hex("p", "").is_err());
        assert!(opt_bn("q", None).unwrap().is_none());
    }
}

//! PEM helpers
//!
//! Thin wrappers over the `pem` crate that always emit LF line endings and
//! tolerate binary (DER) input when probing.

use pem::{EncodeConfig, LineEnding, Pem};

pub const PRIVATE_KEY: &str = "PRIVATE KEY";
pub const ENCRYPTED_PRIVATE_KEY: &str = "ENCRYPTED PRIVATE KEY";
pub const PUBLIC_KEY: &str = "PUBLIC KEY";
pub const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
pub const RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";
pub const DSA_PRIVATE_KEY: &str = "DSA PRIVATE KEY";
pub const EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";
pub const DH_PARAMETERS: &str = "DH PARAMETERS";
pub const CERTIFICATE: &str = "CERTIFICATE";

/// Convert raw bytes to PEM format with specified label
///
/// # Arguments
/// * `label` - PEM label (e.g., "PRIVATE KEY", "PUBLIC KEY")
/// * `der` - Raw DER bytes
pub fn to_pem(label: &str, der: &[u8]) -> String {
    let block = Pem::new(label, der);
    pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Whether the input is PEM armoured text
pub fn is_pem(input: &[u8]) -> bool {
    std::str::from_utf8(input)
        .map(|text| text.contains("-----BEGIN "))
        .unwrap_or(false)
}

/// Every PEM block in the input, in order; empty for non-PEM input
pub fn parse_blocks(input: &[u8]) -> Vec<Pem> {
    if !is_pem(input) {
        return Vec::new();
    }
    pem::parse_many(input).unwrap_or_default()
}

/// First block carrying one of `labels`
pub fn find_block(input: &[u8], labels: &[&str]) -> Option<Pem> {
    parse_blocks(input)
        .into_iter()
        .find(|block| labels.iter().any(|label| *label == block.tag()))
}

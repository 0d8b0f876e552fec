//! Keyseal Cryptography Library
//!
//! Primitives underneath the keyseal key object model: message digests, the
//! envelope cipher registry, raw RSA with padding modes, finite-field DH,
//! DER/PEM codecs, legacy PEM encryption, and the per-thread error queue.

pub mod error;

// Cryptographic algorithm modules
pub mod asymmetric;
pub mod encoding;
pub mod hash;
pub mod kdf;
pub mod symmetric;

// Re-export commonly used types for convenience
pub use asymmetric::{DhGroup, Padding};
pub use error::{error_string, Error, Result};
pub use hash::{DigestSelector, MessageDigest};
pub use kdf::bytes_to_key;
pub use symmetric::{Cipher, CipherSelector};

/// Arbitrary-precision integers shared with the RSA and DSA crates
pub use num_bigint_dig::BigUint;

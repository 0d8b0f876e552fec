//! Key encodings
//!
//! DER structures the primitive crates do not provide, PEM armour, PBES2
//! encrypted PKCS#8 and OpenSSL legacy encrypted PEM.

pub mod der;
pub mod legacy;
pub mod pem;
pub mod pkcs8;

pub use self::der::{DhParameter, DsaPrivateKeyDocument};
pub use self::pem::{find_block, is_pem, parse_blocks, to_pem};

//! Asymmetric cryptography primitives
//!
//! Raw RSA with selectable padding and finite-field Diffie-Hellman group math.
//! Key objects and their encodings live one layer up.

pub mod dh;
pub mod rsa;

pub use self::dh::DhGroup;
pub use self::rsa::Padding;

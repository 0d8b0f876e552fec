//! Symmetric encryption algorithms
//!
//! Bulk ciphers for the digital envelope and for legacy PEM encryption.

pub mod cipher;

pub use self::cipher::{Cipher, CipherSelector};

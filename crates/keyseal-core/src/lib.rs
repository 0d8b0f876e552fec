//! Keyseal Core
//!
//! Multi-recipient digital envelopes, raw RSA encryption with key objects,
//! DH key agreement and the process settings that pick their defaults.

pub mod agreement;
pub mod crypt;
pub mod decapsulator;
pub mod encapsulator;
pub mod envelope;
pub mod error;
pub mod keyring;
pub mod settings;

// Re-export commonly used types
pub use agreement::{dh_compute_key, dh_compute_key_with};
pub use crypt::{decrypt, encrypt};
pub use envelope::Envelope;
pub use error::{CoreError, Result};
pub use keyring::SealedEnvelope;
pub use keyseal_crypto::error_string;
pub use settings::Settings;

//! Raw RSA encryption with a key object
//!
//! The direction follows the key: a private key encrypts with the private
//! exponent (signature-style padding) and a public key decrypts with the
//! public exponent.

use keyseal_crypto::asymmetric::rsa::{
    private_decrypt, private_encrypt, public_decrypt, public_encrypt, Padding,
};
use keyseal_key::{KeyObject, RsaKey};
use tracing::debug;

use crate::error::{CoreError, Result};

fn resolve<'a>(key: &'a KeyObject, padding: Option<&str>) -> Result<(&'a RsaKey, Padding)> {
    let rsa = key.as_rsa().ok_or(keyseal_key::Error::Unsupported {
        algorithm: key.algorithm().name(),
        operation: "raw encryption",
    })?;
    let padding = match padding {
        Some(name) => name.parse::<Padding>()?,
        None => Padding::default(),
    };
    Ok((rsa, padding))
}

fn failed(err: CoreError) -> Option<Vec<u8>> {
    let err = err.record();
    debug!(error = %err, "raw RSA operation failed");
    None
}

/// Encrypt `data`; the output is always exactly the modulus size
///
/// `padding` defaults to `pkcs1`. Primitive failures yield `None`.
pub fn encrypt(key: &KeyObject, data: &[u8], padding: Option<&str>) -> Result<Option<Vec<u8>>> {
    let (rsa, padding) = resolve(key, padding)?;
    let result = match rsa.private() {
        Some(private) => private_encrypt(private, data, padding),
        None => public_encrypt(rsa.public(), data, padding),
    };
    let out = match result {
        Ok(out) => out,
        Err(e) => return Ok(failed(e.into())),
    };
    if out.len() != rsa.size() {
        return Ok(failed(CoreError::Other(format!(
            "RSA output is {} bytes, expected {}",
            out.len(),
            rsa.size()
        ))));
    }
    Ok(Some(out))
}

/// Decrypt `data`; primitive failures yield `None`
pub fn decrypt(key: &KeyObject, data: &[u8], padding: Option<&str>) -> Result<Option<Vec<u8>>> {
    let (rsa, padding) = resolve(key, padding)?;
    let result = match rsa.private() {
        Some(private) => private_decrypt(private, data, padding),
        None => public_decrypt(rsa.public(), data, padding),
    };
    match result {
        Ok(out) => Ok(Some(out)),
        Err(e) => Ok(failed(e.into())),
    }
}

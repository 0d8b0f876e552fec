//! 数字信封解封器
//!
//! Recovers the content key with the recipient's RSA private key and
//! decrypts the body. Any failure after the key checks yields `None`; partial
//! plaintext is never returned.

use keyseal_crypto::{
    asymmetric::rsa::{private_decrypt, Padding},
    Cipher,
};
use keyseal_key::KeyObject;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    error::{CoreError, Result},
    keyring::split_data,
};

/// Open one recipient's view of an envelope
///
/// # Arguments
/// * `data` - `IV || body` as produced by seal
/// * `encrypted_key` - Content key wrapped for this recipient
/// * `key` - The recipient's RSA private key
/// * `cipher` - Bulk cipher used at seal time
pub fn open(data: &[u8], encrypted_key: &[u8], key: &KeyObject, cipher: Cipher) -> Result<Option<Vec<u8>>> {
    let rsa = key.as_rsa().ok_or_else(|| {
        CoreError::EnvelopeError(format!("cannot open an envelope with a {} key", key.algorithm()))
    })?;
    if !key.is_private()? {
        return Err(keyseal_key::Error::NotPrivateKey.into());
    }
    let private = rsa.private().ok_or(keyseal_key::Error::NotPrivateKey)?;

    let (iv, body) = match split_data(data, cipher) {
        Ok(parts) => parts,
        Err(e) => return Ok(nothing(e)),
    };
    let content_key = match private_decrypt(private, encrypted_key, Padding::Pkcs1) {
        Ok(k) => Zeroizing::new(k),
        Err(e) => return Ok(nothing(e.into())),
    };
    let plaintext = match cipher.decrypt(&content_key, iv, body) {
        Ok(p) => p,
        Err(e) => return Ok(nothing(e.into())),
    };
    if plaintext.is_empty() {
        debug!(cipher = %cipher, "empty envelope plaintext");
        return Ok(None);
    }
    debug!(cipher = %cipher, "opened envelope");
    Ok(Some(plaintext))
}

fn nothing(err: CoreError) -> Option<Vec<u8>> {
    let err = err.record();
    debug!(error = %err, "envelope could not be opened");
    None
}

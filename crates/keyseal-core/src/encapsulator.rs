//! 数字信封封装器
//!
//! Encrypts the payload once under a fresh content key and wraps that key
//! with RSA PKCS#1 v1.5 for every recipient.

use keyseal_crypto::{
    asymmetric::rsa::{public_encrypt, Padding},
    Cipher,
};
use keyseal_key::{KeyObject, RsaKey};
use tracing::debug;

use crate::{
    error::{CoreError, Result},
    keyring::SealedEnvelope,
};

/// Seal `data` for every recipient
///
/// # Arguments
/// * `data` - Payload
/// * `recipients` - RSA public (or private) keys, at least one
/// * `cipher` - Bulk cipher
///
/// # Returns
/// `None` when the encrypted body is empty
pub fn seal(data: &[u8], recipients: &[&KeyObject], cipher: Cipher) -> Result<Option<SealedEnvelope>> {
    let rsa_keys = rsa_recipients(recipients)?;

    let content_key = cipher.generate_key();
    let iv = cipher.generate_iv();
    let body = cipher
        .encrypt(&content_key, &iv, data)
        .map_err(|e| CoreError::from(e).record())?;
    if body.is_empty() {
        debug!(cipher = %cipher, "empty envelope body");
        return Ok(None);
    }

    let encrypted_keys = rsa_keys
        .iter()
        .map(|rsa| public_encrypt(rsa.public(), &content_key, Padding::Pkcs1))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CoreError::from(e).record())?;

    let mut sealed = iv;
    sealed.extend_from_slice(&body);
    debug!(cipher = %cipher, recipients = encrypted_keys.len(), "sealed envelope");
    Ok(Some(SealedEnvelope::new(sealed, encrypted_keys)))
}

fn rsa_recipients<'a>(recipients: &[&'a KeyObject]) -> Result<Vec<&'a RsaKey>> {
    if recipients.is_empty() {
        return Err(CoreError::NoRecipients);
    }
    recipients
        .iter()
        .enumerate()
        .map(|(index, key)| {
            key.as_rsa().ok_or_else(|| {
                CoreError::EnvelopeError(format!(
                    "recipient {} is a {} key; only RSA keys can receive envelopes",
                    index,
                    key.algorithm()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyseal_key::{KeySpec, NewKey};

    #[test]
    fn test_input_shape() {
        assert!(matches!(
            seal(b"data", &[], Cipher::Rc4),
            Err(CoreError::NoRecipients)
        ));

        let ec = keyseal_key::new_key(NewKey::Generate(KeySpec::Ec { bits: None })).unwrap();
        assert!(matches!(
            seal(b"data", &[&ec], Cipher::Rc4),
            Err(CoreError::EnvelopeError(_))
        ));
    }
}

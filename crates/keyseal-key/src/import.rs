//! Key import
//!
//! Every supported input shape funnels through [`read`]. Encoded input that
//! cannot be decoded yields `Ok(None)` with the failure recorded on the
//! thread's error queue; shape mismatches (asking a public key or a
//! certificate for private material) are hard errors.

use keyseal_crypto::encoding::{
    find_block, is_pem, legacy,
    pem::{
        DSA_PRIVATE_KEY, EC_PRIVATE_KEY, ENCRYPTED_PRIVATE_KEY, PRIVATE_KEY, PUBLIC_KEY,
        RSA_PRIVATE_KEY, RSA_PUBLIC_KEY,
    },
    pkcs8::decrypt_private_key,
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    cert::PublicKeySource,
    codec,
    error::{Error, Result},
    key::{DsaKey, EcKey, KeyObject, Privacy, RsaKey},
    params::KeyParams,
};

/// Input accepted by [`read`]
pub enum KeySource<'a> {
    /// An already constructed key; copied
    Existing(&'a KeyObject),
    /// Subject public key of a certificate
    Certificate(&'a dyn PublicKeySource),
    /// PEM text or raw DER bytes
    Encoded(&'a [u8]),
    /// Structured hex parameter map
    Params(&'a KeyParams),
}

/// Which half of the key the caller asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyRole {
    #[default]
    Public,
    Private,
}

/// Read a key from any supported source
///
/// # Arguments
/// * `source` - Where the key comes from
/// * `role` - Whether a public or private key is wanted
/// * `passphrase` - Used for encrypted private keys; absent means empty
///
/// # Returns
/// `Ok(None)` when encoded input holds no decodable key of the requested role
pub fn read(source: KeySource<'_>, role: KeyRole, passphrase: Option<&str>) -> Result<Option<KeyObject>> {
    match source {
        KeySource::Existing(key) => {
            if role == KeyRole::Private && key.privacy() == Privacy::Public {
                return Err(Error::NotPrivateKey.record());
            }
            Ok(Some(key.clone()))
        }
        KeySource::Certificate(cert) => match role {
            KeyRole::Private => Err(Error::CertificateError(
                "a certificate does not carry a private key".to_string(),
            )
            .record()),
            KeyRole::Public => {
                let spki = cert.subject_public_key().map_err(Error::record)?;
                codec::public_from_spki_der(&spki).map(Some).map_err(Error::record)
            }
        },
        KeySource::Encoded(input) => {
            let passphrase = passphrase.unwrap_or_default().as_bytes();
            let decoded = match role {
                KeyRole::Public => read_public(input),
                KeyRole::Private => read_private(input, passphrase),
            };
            Ok(decoded.map_err(no_key).ok())
        }
        KeySource::Params(params) => {
            let key = KeyObject::from_params(params).map_err(Error::record)?;
            if role == KeyRole::Private && key.privacy() == Privacy::Public {
                return Err(Error::NotPrivateKey.record());
            }
            Ok(Some(key))
        }
    }
}

fn no_key(err: Error) {
    let err = err.record();
    debug!(error = %err, "no key decoded from input");
}

fn read_public(input: &[u8]) -> Result<KeyObject> {
    if !is_pem(input) {
        return codec::public_from_spki_der(input);
    }
    let block = find_block(input, &[PUBLIC_KEY, RSA_PUBLIC_KEY])
        .ok_or_else(|| Error::ParseError("no public key PEM block".to_string()))?;
    match block.tag() {
        RSA_PUBLIC_KEY => Ok(RsaKey::from_pkcs1_public_der(block.contents())?.into()),
        _ => codec::public_from_spki_der(block.contents()),
    }
}

fn read_private(input: &[u8], passphrase: &[u8]) -> Result<KeyObject> {
    if !is_pem(input) {
        return codec::private_from_der(input);
    }
    let block = find_block(
        input,
        &[PRIVATE_KEY, ENCRYPTED_PRIVATE_KEY, RSA_PRIVATE_KEY, DSA_PRIVATE_KEY, EC_PRIVATE_KEY],
    )
    .ok_or_else(|| Error::ParseError("no private key PEM block".to_string()))?;

    match block.tag() {
        PRIVATE_KEY => codec::private_from_pkcs8_der(block.contents()),
        ENCRYPTED_PRIVATE_KEY => {
            let doc = decrypt_private_key(block.contents(), passphrase)?;
            codec::private_from_pkcs8_der(doc.as_bytes())
        }
        tag => {
            let der = if legacy::is_encrypted(&block) {
                legacy::decrypt_block(&block, passphrase)?
            } else {
                Zeroizing::new(block.contents().to_vec())
            };
            match tag {
                RSA_PRIVATE_KEY => Ok(RsaKey::from_pkcs1_der(&der)?.into()),
                DSA_PRIVATE_KEY => Ok(DsaKey::from_traditional_der(&der)?.into()),
                _ => Ok(EcKey::from_sec1_der(&der)?.into()),
            }
        }
    }
}

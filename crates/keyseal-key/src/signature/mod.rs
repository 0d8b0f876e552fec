//! Digest-then-sign signatures
//!
//! The message is streamed through a digest context and the resulting hash
//! is signed: RSA with PKCS#1 v1.5 (DigestInfo prefix of the chosen digest),
//! DSA and ECDSA over the prehash with DER encoded signatures.

use der::{Decode, Encode};
use keyseal_crypto::{DigestSelector, MessageDigest};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use tracing::debug;

use crate::{
    error::{Error, Result},
    key::{DsaKey, EcKey, KeyMaterial, KeyObject, RsaKey},
};

/// Digest used when the caller names none
pub const DEFAULT_DIGEST: MessageDigest = MessageDigest::Sha1;

/// 验签结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Invalid,
    /// The signature could not be checked at all (malformed input)
    Error,
}

impl VerifyOutcome {
    /// Classic numeric form: 1, 0, -1
    pub fn code(&self) -> i32 {
        match self {
            VerifyOutcome::Valid => 1,
            VerifyOutcome::Invalid => 0,
            VerifyOutcome::Error => -1,
        }
    }

    pub fn is_valid(&self) -> bool {
        *self == VerifyOutcome::Valid
    }
}

fn resolve(digest: Option<DigestSelector<'_>>) -> Result<MessageDigest> {
    match digest {
        Some(selector) => Ok(selector.resolve()?),
        None => Ok(DEFAULT_DIGEST),
    }
}

fn digest_of(md: MessageDigest, data: &[u8]) -> Box<[u8]> {
    let mut hasher = md.hasher();
    hasher.update(data);
    hasher.finalize()
}

fn pkcs1v15_scheme(md: MessageDigest) -> Pkcs1v15Sign {
    match md {
        MessageDigest::Md5 => Pkcs1v15Sign::new::<md5::Md5>(),
        MessageDigest::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
        MessageDigest::Sha224 => Pkcs1v15Sign::new::<sha2::Sha224>(),
        MessageDigest::Sha256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
        MessageDigest::Sha384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
        MessageDigest::Sha512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
    }
}

// ============================================================================
// Sign
// ============================================================================

/// Sign `data` with a private key
///
/// # Arguments
/// * `data` - Message bytes
/// * `key` - Signing key; must hold private material
/// * `digest` - Digest name or handle, SHA-1 when absent
///
/// # Returns
/// Raw signature bytes (PKCS#1 block for RSA, DER for DSA and EC)
pub fn sign(data: &[u8], key: &KeyObject, digest: Option<DigestSelector<'_>>) -> Result<Vec<u8>> {
    let md = resolve(digest)?;
    let hashed = digest_of(md, data);
    let signature = match key.material() {
        KeyMaterial::Rsa(rsa) => sign_rsa(rsa, md, &hashed),
        KeyMaterial::Dsa(dsa) => sign_dsa(dsa, &hashed),
        KeyMaterial::Ec(ec) => sign_ec(ec, &hashed),
        KeyMaterial::Dh(_) => {
            return Err(Error::Unsupported {
                algorithm: "DH",
                operation: "signing",
            })
        }
    }
    .map_err(Error::record)?;
    debug!(algorithm = %key.algorithm(), digest = %md, "signed message");
    Ok(signature)
}

fn sign_rsa(key: &RsaKey, md: MessageDigest, hashed: &[u8]) -> Result<Vec<u8>> {
    let private = key.private().ok_or(Error::NotPrivateKey)?;
    private
        .sign(pkcs1v15_scheme(md), hashed)
        .map_err(|e| Error::SignatureError(format!("RSA signing failed: {}", e)))
}

fn sign_dsa(key: &DsaKey, hashed: &[u8]) -> Result<Vec<u8>> {
    let signing = key.signing_key().ok_or(Error::NotPrivateKey)?;
    let signature: dsa::Signature = signing
        .sign_prehash(hashed)
        .map_err(|e| Error::SignatureError(format!("DSA signing failed: {}", e)))?;
    signature
        .to_der()
        .map_err(|e| Error::SignatureError(format!("DSA signature encoding failed: {}", e)))
}

fn sign_ec(key: &EcKey, hashed: &[u8]) -> Result<Vec<u8>> {
    let secret = key.secret_key().ok_or(Error::NotPrivateKey)?;
    let signing = p256::ecdsa::SigningKey::from(secret);
    let signature: p256::ecdsa::Signature = signing
        .sign_prehash(hashed)
        .map_err(|e| Error::SignatureError(format!("ECDSA signing failed: {}", e)))?;
    Ok(signature.to_der().as_bytes().to_vec())
}

// ============================================================================
// Verify
// ============================================================================

/// Verify `signature` over `data`
///
/// Unknown digests and keys that cannot verify (DH) are errors. A signature
/// that does not match is [`VerifyOutcome::Invalid`]; one that cannot even
/// be decoded is [`VerifyOutcome::Error`]. Both are recorded.
pub fn verify(
    data: &[u8],
    signature: &[u8],
    key: &KeyObject,
    digest: Option<DigestSelector<'_>>,
) -> Result<VerifyOutcome> {
    let md = resolve(digest)?;
    let hashed = digest_of(md, data);
    let checked = match key.material() {
        KeyMaterial::Rsa(rsa) => verify_rsa(rsa.public(), md, &hashed, signature),
        KeyMaterial::Dsa(dsa) => verify_dsa(dsa, &hashed, signature),
        KeyMaterial::Ec(ec) => verify_ec(ec, &hashed, signature),
        KeyMaterial::Dh(_) => {
            return Err(Error::Unsupported {
                algorithm: "DH",
                operation: "verification",
            })
        }
    };
    let outcome = match checked {
        Ok(()) => VerifyOutcome::Valid,
        Err(Malformed(message)) => {
            Error::SignatureError(message).record();
            VerifyOutcome::Error
        }
        Err(Mismatch(message)) => {
            Error::SignatureError(message).record();
            VerifyOutcome::Invalid
        }
    };
    debug!(algorithm = %key.algorithm(), digest = %md, outcome = outcome.code(), "verified signature");
    Ok(outcome)
}

enum Rejection {
    Malformed(String),
    Mismatch(String),
}

use Rejection::{Malformed, Mismatch};

fn verify_rsa(
    public: &RsaPublicKey,
    md: MessageDigest,
    hashed: &[u8],
    signature: &[u8],
) -> std::result::Result<(), Rejection> {
    use rsa::traits::PublicKeyParts;

    if signature.len() != public.size() {
        return Err(Malformed(format!(
            "RSA signature length {} does not match modulus size {}",
            signature.len(),
            public.size()
        )));
    }
    public
        .verify(pkcs1v15_scheme(md), hashed, signature)
        .map_err(|_| Mismatch("bad RSA signature".to_string()))
}

fn verify_dsa(key: &DsaKey, hashed: &[u8], signature: &[u8]) -> std::result::Result<(), Rejection> {
    let signature = dsa::Signature::from_der(signature)
        .map_err(|e| Malformed(format!("undecodable DSA signature: {}", e)))?;
    key.verifying_key()
        .verify_prehash(hashed, &signature)
        .map_err(|_| Mismatch("bad DSA signature".to_string()))
}

fn verify_ec(key: &EcKey, hashed: &[u8], signature: &[u8]) -> std::result::Result<(), Rejection> {
    let signature = p256::ecdsa::Signature::from_der(signature)
        .map_err(|e| Malformed(format!("undecodable ECDSA signature: {}", e)))?;
    let verifying = p256::ecdsa::VerifyingKey::from(key.public_key());
    verifying
        .verify_prehash(hashed, &signature)
        .map_err(|_| Mismatch("bad ECDSA signature".to_string()))
}

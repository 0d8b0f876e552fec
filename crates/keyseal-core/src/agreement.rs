//! Finite-field DH key agreement

use keyseal_crypto::BigUint;
use keyseal_key::KeyObject;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CoreError, Result};

/// Shared secret between a peer's public value and a local DH private key
///
/// The peer value must satisfy `1 < y < p - 1`. The secret is the unpadded
/// big-endian encoding of `y^x mod p`.
pub fn dh_compute_key(peer_public: &BigUint, local: &KeyObject) -> Result<Zeroizing<Vec<u8>>> {
    let dh = local.as_dh().ok_or_else(|| {
        CoreError::AgreementError(format!("local key is {}, not DH", local.algorithm())).record()
    })?;
    if !dh.is_private() {
        return Err(CoreError::from(keyseal_key::Error::NotPrivateKey).record());
    }
    let secret = dh
        .compute_key(peer_public)
        .map_err(|e| CoreError::AgreementError(e.to_string()).record())?;
    debug!(bits = dh.bits(), len = secret.len(), "computed DH shared secret");
    Ok(secret)
}

/// [`dh_compute_key`] with the peer given as a key object on the same group
pub fn dh_compute_key_with(peer: &KeyObject, local: &KeyObject) -> Result<Zeroizing<Vec<u8>>> {
    let peer_dh = peer.as_dh().ok_or_else(|| {
        CoreError::AgreementError(format!("peer key is {}, not DH", peer.algorithm())).record()
    })?;
    if let Some(dh) = local.as_dh() {
        if dh.group() != peer_dh.group() {
            return Err(CoreError::AgreementError("peer uses different DH parameters".to_string()).record());
        }
    }
    dh_compute_key(peer_dh.public_value(), local)
}

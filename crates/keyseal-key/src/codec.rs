//! DER dispatch across the supported key algorithms
//!
//! PKCS#8 and SPKI documents are routed by their algorithm OID. Traditional
//! private keys carry no OID, so their decoders are tried in turn.

use keyseal_crypto::encoding::der::{
    unsupported_oid, DH_KEY_AGREEMENT, ID_DSA, ID_EC_PUBLIC_KEY, RSA_ENCRYPTION,
};
use pkcs8::{PrivateKeyInfo, SubjectPublicKeyInfoRef};
use tracing::trace;

use crate::{
    error::{Error, Result},
    key::{DhKey, DsaKey, EcKey, KeyObject, RsaKey},
};

/// Decode an unencrypted PKCS#8 `PrivateKeyInfo`
pub fn private_from_pkcs8_der(der: &[u8]) -> Result<KeyObject> {
    let info = PrivateKeyInfo::try_from(der)
        .map_err(|e| Error::ParseError(format!("not a PKCS8 private key: {}", e)))?;
    let oid = info.algorithm.oid;
    Ok(match oid {
        RSA_ENCRYPTION => RsaKey::from_pkcs8_der(der)?.into(),
        ID_DSA => DsaKey::from_pkcs8_der(der)?.into(),
        ID_EC_PUBLIC_KEY => EcKey::from_pkcs8_der(der)?.into(),
        DH_KEY_AGREEMENT => DhKey::from_pkcs8_der(der)?.into(),
        other => return Err(unsupported_oid(&other).into()),
    })
}

/// Decode a `SubjectPublicKeyInfo`
pub fn public_from_spki_der(der: &[u8]) -> Result<KeyObject> {
    let spki = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| Error::ParseError(format!("not a public key: {}", e)))?;
    let oid = spki.algorithm.oid;
    Ok(match oid {
        RSA_ENCRYPTION => RsaKey::from_spki_der(der)?.into(),
        ID_DSA => DsaKey::from_spki_der(der)?.into(),
        ID_EC_PUBLIC_KEY => EcKey::from_spki_der(der)?.into(),
        DH_KEY_AGREEMENT => DhKey::from_spki_der(der)?.into(),
        other => return Err(unsupported_oid(&other).into()),
    })
}

/// Decode a traditional private key: PKCS#1, OpenSSL DSA, then SEC1
pub fn private_from_traditional_der(der: &[u8]) -> Result<KeyObject> {
    if let Ok(key) = RsaKey::from_pkcs1_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = DsaKey::from_traditional_der(der) {
        return Ok(key.into());
    }
    EcKey::from_sec1_der(der)
        .map(KeyObject::from)
        .map_err(|_| Error::ParseError("unrecognised traditional private key".to_string()))
}

/// Any DER private key, PKCS#8 first
pub fn private_from_der(der: &[u8]) -> Result<KeyObject> {
    match private_from_pkcs8_der(der) {
        Ok(key) => Ok(key),
        Err(e) => {
            trace!(error = %e, "PKCS8 decode failed, trying traditional formats");
            private_from_traditional_der(der)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{dh::tests::oakley_params, dsa::tests::fixture, Algorithm};

    #[test]
    fn test_pkcs8_dispatch() {
        let dh = DhKey::from_params(&oakley_params()).unwrap();
        let key = private_from_pkcs8_der(&dh.to_pkcs8_der().unwrap()).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Dh);

        let ec = EcKey::generate(None);
        let key = private_from_der(&ec.to_pkcs8_der().unwrap()).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Ec);
    }

    #[test]
    fn test_spki_dispatch() {
        let dsa = fixture();
        let key = public_from_spki_der(&dsa.to_spki_der().unwrap()).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Dsa);
        assert!(!key.is_private().unwrap());
    }

    #[test]
    fn test_traditional_fallback() {
        let dsa = fixture();
        let key = private_from_der(&dsa.to_traditional_der().unwrap()).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Dsa);
        assert!(key.is_private().unwrap());

        let ec = EcKey::generate(None);
        let sec1 = ec.secret_key().unwrap().to_sec1_der().unwrap();
        let key = private_from_der(&sec1).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Ec);
    }

    #[test]
    fn test_garbage() {
        assert!(private_from_der(b"\x30\x03\x02\x01\x00").is_err());
        assert!(public_from_spki_der(b"not der").is_err());
    }
}

use der::{asn1::AnyRef, asn1::BitStringRef, Decode, Encode};
use keyseal_crypto::{
    asymmetric::DhGroup,
    encoding::der::{decode_integer, encode_integer, DH_KEY_AGREEMENT},
    encoding::DhParameter,
    BigUint,
};
use pkcs8::{spki::AlgorithmIdentifierRef, PrivateKeyInfo, SubjectPublicKeyInfoRef};
use tracing::debug;
use zeroize::Zeroizing;

use super::util::{bn_from_hex, bn_to_hex, opt_bn};
use crate::{
    error::{Error, Result},
    params::DhParams,
};

fn der_error(e: der::Error) -> Error {
    Error::CryptoError(e.into())
}

/// DH key material over a finite-field group
#[derive(Clone)]
pub struct DhKey {
    group: DhGroup,
    public: BigUint,
    private: Option<Zeroizing<BigUint>>,
}

impl DhKey {
    /// Generate safe-prime parameters and a key pair
    pub fn generate(bits: usize, generator: u32) -> Result<Self> {
        let group = DhGroup::generate(bits, generator)?;
        debug!(bits, generator, "generated DH parameters");
        Ok(Self::from_group(group))
    }

    /// Fresh key pair within existing parameters
    pub fn from_group(group: DhGroup) -> Self {
        let private = group.generate_private_key();
        let public = group.public_key(&private);
        Self {
            group,
            public,
            private: Some(private),
        }
    }

    /// Build from a hex parameter map
    ///
    /// `p` and `g` are required. A `priv_key` determines the public value (a
    /// supplied `pub_key` must match); a lone `pub_key` yields a public key;
    /// with neither a key pair is generated.
    pub fn from_params(params: &DhParams) -> Result<Self> {
        let p = match params.p.as_ref() {
            Some(hex) => bn_from_hex("p", hex)?,
            None => return Err(Error::invalid("p", "required DH parameter is missing")),
        };
        let g = match params.g.as_ref() {
            Some(hex) => bn_from_hex("g", hex)?,
            None => return Err(Error::invalid("g", "required DH parameter is missing")),
        };
        let group = DhGroup::new(p, g).map_err(|e| Error::invalid("p", e.to_string()))?;
        let x = opt_bn("priv_key", params.priv_key.as_ref())?.map(Zeroizing::new);
        if let Some(x) = &x {
            if **x < BigUint::from(1u32) || **x >= group.p() - 1u32 {
                return Err(Error::invalid("priv_key", "must lie in [1, p - 2]"));
            }
        }
        let y = opt_bn("pub_key", params.pub_key.as_ref())?;

        match (x, y) {
            (Some(x), supplied) => {
                let public = group.public_key(&x);
                if supplied.is_some_and(|y| y != public) {
                    return Err(Error::invalid("pub_key", "does not match priv_key"));
                }
                Ok(Self {
                    group,
                    public,
                    private: Some(x),
                })
            }
            (None, Some(y)) => {
                group
                    .check_public_key(&y)
                    .map_err(|e| Error::invalid("pub_key", e.to_string()))?;
                Ok(Self {
                    group,
                    public: y,
                    private: None,
                })
            }
            (None, None) => Ok(Self::from_group(group)),
        }
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let pki = PrivateKeyInfo::from_der(der).map_err(der_error)?;
        let group = group_from_algorithm(pki.algorithm.oid, pki.algorithm.parameters)?;
        let x = Zeroizing::new(decode_integer(pki.private_key)?);
        let public = group.public_key(&x);
        Ok(Self {
            group,
            public,
            private: Some(x),
        })
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(der_error)?;
        let group = group_from_algorithm(spki.algorithm.oid, spki.algorithm.parameters)?;
        let bits = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::ImportError("DH public key has unused bits".to_string()))?;
        let public = decode_integer(bits)?;
        group
            .check_public_key(&public)
            .map_err(|e| Error::ImportError(e.to_string()))?;
        Ok(Self {
            group,
            public,
            private: None,
        })
    }
}

fn group_from_algorithm(oid: pkcs8::ObjectIdentifier, parameters: Option<AnyRef<'_>>) -> Result<DhGroup> {
    if oid != DH_KEY_AGREEMENT {
        return Err(Error::ImportError(format!("not a DH key: {}", oid)));
    }
    let parameters =
        parameters.ok_or_else(|| Error::ImportError("missing DH parameters".to_string()))?;
    let dh = DhParameter::from_any(parameters)?;
    Ok(DhGroup::new(dh.p(), dh.g())?)
}

impl DhKey {
    pub fn group(&self) -> &DhGroup {
        &self.group
    }

    pub fn public_value(&self) -> &BigUint {
        &self.public
    }

    pub fn is_private(&self) -> bool {
        self.private.is_some()
    }

    pub fn bits(&self) -> usize {
        self.group.bits()
    }

    pub fn to_public(&self) -> Self {
        Self {
            group: self.group.clone(),
            public: self.public.clone(),
            private: None,
        }
    }

    pub fn to_params(&self) -> DhParams {
        DhParams {
            p: Some(bn_to_hex(self.group.p())),
            g: Some(bn_to_hex(self.group.g())),
            priv_key: self.private.as_ref().map(|x| bn_to_hex(x)),
            pub_key: Some(bn_to_hex(&self.public)),
        }
    }

    /// Shared secret with a peer's public value
    pub fn compute_key(&self, peer: &BigUint) -> Result<Zeroizing<Vec<u8>>> {
        let x = self.private.as_ref().ok_or(Error::NotPrivateKey)?;
        Ok(self.group.compute_key(x, peer)?)
    }

    /// PKCS#3 `DHParameter` DER
    pub fn parameters_der(&self) -> Result<Vec<u8>> {
        let params = DhParameter::new(self.group.p(), self.group.g())?;
        params.to_der().map_err(der_error)
    }

    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let x = self.private.as_ref().ok_or(Error::NotPrivateKey)?;
        let params_der = self.parameters_der()?;
        let algorithm = AlgorithmIdentifierRef {
            oid: DH_KEY_AGREEMENT,
            parameters: Some(AnyRef::from_der(&params_der).map_err(der_error)?),
        };
        let x_der = Zeroizing::new(encode_integer(x)?);
        let pki = PrivateKeyInfo::new(algorithm, &x_der);
        Ok(Zeroizing::new(pki.to_der().map_err(der_error)?))
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let params_der = self.parameters_der()?;
        let algorithm = AlgorithmIdentifierRef {
            oid: DH_KEY_AGREEMENT,
            parameters: Some(AnyRef::from_der(&params_der).map_err(der_error)?),
        };
        let y_der = encode_integer(&self.public)?;
        let spki = SubjectPublicKeyInfoRef {
            algorithm,
            subject_public_key: BitStringRef::from_bytes(&y_der).map_err(der_error)?,
        };
        spki.to_der().map_err(der_error)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// RFC 2409 Oakley group 1 (768-bit MODP)
    pub(crate) const OAKLEY_768: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";

    pub(crate) fn oakley_params() -> DhParams {
        DhParams {
            p: Some(OAKLEY_768.to_string()),
            g: Some("2".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_pair_from_domain() {
        let key = DhKey::from_params(&oakley_params()).unwrap();
        assert!(key.is_private());
        assert_eq!(key.bits(), 768);
        let params = key.to_params();
        assert_eq!(params.p.as_deref(), Some(OAKLEY_768));
        assert!(params.priv_key.is_some());
    }

    #[test]
    fn test_priv_key_determines_pub_key() {
        let key = DhKey::from_params(&oakley_params()).unwrap();
        let params = key.to_params();
        let without_pub = DhParams {
            pub_key: None,
            ..params.clone()
        };
        assert_eq!(DhKey::from_params(&without_pub).unwrap().to_params(), params);

        let mismatched = DhParams {
            pub_key: Some("3".to_string()),
            ..params
        };
        assert!(matches!(
            DhKey::from_params(&mismatched),
            Err(Error::InvalidParameter { name: "pub_key", .. })
        ));
    }

    #[test]
    fn test_missing_domain() {
        let params = DhParams {
            g: None,
            ..oakley_params()
        };
        assert!(matches!(
            DhKey::from_params(&params),
            Err(Error::InvalidParameter { name: "g", .. })
        ));
    }

    #[test]
    fn test_der_roundtrips() {
        let key = DhKey::from_params(&oakley_params()).unwrap();

        let pkcs8 = key.to_pkcs8_der().unwrap();
        assert_eq!(DhKey::from_pkcs8_der(&pkcs8).unwrap().to_params(), key.to_params());

        let spki = key.to_spki_der().unwrap();
        let public = DhKey::from_spki_der(&spki).unwrap();
        assert!(!public.is_private());
        assert_eq!(public.to_params(), key.to_public().to_params());

        let params = DhParameter::from_der(&key.parameters_der().unwrap()).unwrap();
        assert_eq!(&params.p(), key.group().p());
    }

    #[test]
    fn test_agreement() {
        let alice = DhKey::from_params(&oakley_params()).unwrap();
        let bob = DhKey::from_group(alice.group().clone());
        let s1 = alice.compute_key(bob.public_value()).unwrap();
        let s2 = bob.compute_key(alice.public_value()).unwrap();
        assert_eq!(*s1, *s2);
        assert!(matches!(
            alice.to_public().compute_key(bob.public_value()),
            Err(Error::NotPrivateKey)
        ));
    }
}

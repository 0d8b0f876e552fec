use der::{Decode, Encode};
use dsa::{Components, KeySize, SigningKey, VerifyingKey};
use keyseal_crypto::{encoding::der::from_uint, encoding::DsaPrivateKeyDocument, BigUint};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand::{rngs::StdRng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use super::util::{bn_from_hex, bn_to_hex, opt_bn};
use crate::{
    error::{Error, Result},
    params::DsaParams,
};

/// DSA key material: verifying key always, signing key when `x` is known
#[derive(Clone)]
pub struct DsaKey {
    verifying: VerifyingKey,
    signing: Option<SigningKey>,
}

impl From<SigningKey> for DsaKey {
    fn from(value: SigningKey) -> Self {
        Self {
            verifying: value.verifying_key().clone(),
            signing: Some(value),
        }
    }
}

impl From<VerifyingKey> for DsaKey {
    fn from(value: VerifyingKey) -> Self {
        Self {
            verifying: value,
            signing: None,
        }
    }
}

#[allow(deprecated)]
fn key_size(bits: usize) -> Result<KeySize> {
    match bits {
        1024 => Ok(KeySize::DSA_1024_160),
        2048 => Ok(KeySize::DSA_2048_256),
        3072 => Ok(KeySize::DSA_3072_256),
        other => Err(Error::invalid(
            "bits",
            format!("unsupported DSA size {} (1024, 2048 or 3072)", other),
        )),
    }
}

impl DsaKey {
    /// Generate domain parameters and a key pair
    ///
    /// # Arguments
    /// * `bits` - 1024, 2048 or 3072
    /// * `seed` - Optional seed; the same seed yields the same domain
    ///   parameters
    pub fn generate(bits: usize, seed: Option<&[u8]>) -> Result<Self> {
        let size = key_size(bits)?;
        let components = match seed {
            Some(seed) => {
                let mut seeded = StdRng::from_seed(Sha256::digest(seed).into());
                Components::generate(&mut seeded, size)
            }
            None => Components::generate(&mut rand::thread_rng(), size),
        };
        let signing = SigningKey::generate(&mut rand::thread_rng(), components);
        debug!(bits, seeded = seed.is_some(), "generated DSA key");
        Ok(signing.into())
    }

    /// Build from a hex parameter map
    ///
    /// `p`, `q`, `g` are required. With `priv_key` the public value is
    /// derived (a supplied `pub_key` must match); with only `pub_key` the key
    /// is public; with neither a fresh key pair is generated.
    pub fn from_params(params: &DsaParams) -> Result<Self> {
        let p = required("p", params.p.as_ref())?;
        let q = required("q", params.q.as_ref())?;
        let g = required("g", params.g.as_ref())?;
        let x = opt_bn("priv_key", params.priv_key.as_ref())?;
        let y = opt_bn("pub_key", params.pub_key.as_ref())?;

        let one = BigUint::from(1u32);
        if p <= BigUint::from(3u32) {
            return Err(Error::invalid("p", "modulus too small"));
        }
        if g <= one || g >= &p - &one {
            return Err(Error::invalid("g", "generator must lie in (1, p - 1)"));
        }
        if let Some(x) = &x {
            if x < &one || x >= &q {
                return Err(Error::invalid("priv_key", "must lie in [1, q - 1]"));
            }
        }
        if let Some(y) = &y {
            if y <= &one || y >= &p {
                return Err(Error::invalid("pub_key", "must lie in (1, p)"));
            }
        }

        let components = Components::from_components(p, q, g)
            .map_err(|e| Error::invalid("p", format!("invalid DSA domain parameters: {}", e)))?;

        match (x, y) {
            (Some(x), supplied) => {
                let derived = components.g().modpow(&x, components.p());
                if let Some(y) = supplied {
                    if y != derived {
                        return Err(Error::invalid("pub_key", "does not match priv_key"));
                    }
                }
                let verifying = VerifyingKey::from_components(components, derived)
                    .map_err(|e| Error::invalid("pub_key", e.to_string()))?;
                let signing = SigningKey::from_components(verifying, x)
                    .map_err(|e| Error::invalid("priv_key", e.to_string()))?;
                Ok(signing.into())
            }
            (None, Some(y)) => {
                let verifying = VerifyingKey::from_components(components, y)
                    .map_err(|e| Error::invalid("pub_key", e.to_string()))?;
                Ok(verifying.into())
            }
            (None, None) => Ok(SigningKey::generate(&mut rand::thread_rng(), components).into()),
        }
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let signing = SigningKey::from_pkcs8_der(der)
            .map_err(|e| Error::ImportError(format!("DSA PKCS8 DER import failed: {}", e)))?;
        Ok(signing.into())
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let verifying = VerifyingKey::from_public_key_der(der)
            .map_err(|e| Error::ImportError(format!("DSA SPKI DER import failed: {}", e)))?;
        Ok(verifying.into())
    }

    /// Import the OpenSSL traditional `DSAPrivateKey` structure
    pub fn from_traditional_der(der: &[u8]) -> Result<Self> {
        let doc = DsaPrivateKeyDocument::from_der(der)
            .map_err(|e| Error::ImportError(format!("DSA private key parse failed: {}", e)))?;
        if doc.version != 0 {
            return Err(Error::ImportError(format!(
                "unsupported DSA private key version {}",
                doc.version
            )));
        }
        let params = DsaParams {
            p: Some(bn_to_hex(&from_uint(&doc.p))),
            q: Some(bn_to_hex(&from_uint(&doc.q))),
            g: Some(bn_to_hex(&from_uint(&doc.g))),
            priv_key: Some(bn_to_hex(&from_uint(&doc.private_key))),
            pub_key: Some(bn_to_hex(&from_uint(&doc.public_key))),
        };
        Self::from_params(&params).map_err(|e| Error::ImportError(e.to_string()))
    }
}

impl DsaKey {
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying
    }

    pub fn signing_key(&self) -> Option<&SigningKey> {
        self.signing.as_ref()
    }

    pub fn is_private(&self) -> bool {
        self.signing.is_some()
    }

    /// Size of `p` in bits
    pub fn bits(&self) -> usize {
        self.verifying.components().p().bits()
    }

    pub fn to_public(&self) -> Self {
        self.verifying.clone().into()
    }

    pub fn to_params(&self) -> DsaParams {
        let components = self.verifying.components();
        DsaParams {
            p: Some(bn_to_hex(components.p())),
            q: Some(bn_to_hex(components.q())),
            g: Some(bn_to_hex(components.g())),
            priv_key: self.signing.as_ref().map(|s| bn_to_hex(s.x())),
            pub_key: Some(bn_to_hex(self.verifying.y())),
        }
    }

    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let signing = self.signing.as_ref().ok_or(Error::NotPrivateKey)?;
        let doc = signing
            .to_pkcs8_der()
            .map_err(|e| Error::ExportError(format!("DSA PKCS8 export failed: {}", e)))?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .verifying
            .to_public_key_der()
            .map_err(|e| Error::ExportError(format!("DSA SPKI export failed: {}", e)))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// OpenSSL traditional `DSAPrivateKey` DER
    pub fn to_traditional_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let signing = self.signing.as_ref().ok_or(Error::NotPrivateKey)?;
        let components = self.verifying.components();
        let doc = DsaPrivateKeyDocument::new(
            components.p(),
            components.q(),
            components.g(),
            self.verifying.y(),
            signing.x(),
        )?;
        let der = doc
            .to_der()
            .map_err(|e| Error::ExportError(format!("DSA private key encoding failed: {}", e)))?;
        Ok(Zeroizing::new(der))
    }
}

fn required(name: &'static str, value: Option<&String>) -> Result<BigUint> {
    match value {
        Some(hex) => bn_from_hex(name, hex),
        None => Err(Error::invalid(name, "required DSA domain parameter is missing")),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// 1024-bit domain parameters are slow to generate; share one key
    pub(crate) fn fixture() -> &'static DsaKey {
        static KEY: OnceLock<DsaKey> = OnceLock::new();
        KEY.get_or_init(|| DsaKey::generate(1024, None).unwrap())
    }

    #[test]
    fn test_generated_key() {
        let key = fixture();
        assert_eq!(key.bits(), 1024);
        assert!(key.is_private());
        let params = key.to_params();
        assert!(params.priv_key.is_some() && params.pub_key.is_some());
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(
            DsaKey::generate(512, None),
            Err(Error::InvalidParameter { name: "bits", .. })
        ));
    }

    #[test]
    fn test_params_roundtrip() {
        let params = fixture().to_params();
        let rebuilt = DsaKey::from_params(&params).unwrap();
        assert!(rebuilt.is_private());
        assert_eq!(rebuilt.to_params(), params);
    }

    #[test]
    fn test_params_derive_public_value() {
        let params = fixture().to_params();
        let without_y = DsaParams {
            pub_key: None,
            ..params.clone()
        };
        assert_eq!(DsaKey::from_params(&without_y).unwrap().to_params(), params);

        let wrong_y = DsaParams {
            pub_key: params.g.clone(),
            ..params.clone()
        };
        assert!(matches!(
            DsaKey::from_params(&wrong_y),
            Err(Error::InvalidParameter { name: "pub_key", .. })
        ));
    }

    #[test]
    fn test_params_public_only_and_generated() {
        let params = fixture().to_params();
        let public = DsaKey::from_params(&DsaParams {
            priv_key: None,
            ..params.clone()
        })
        .unwrap();
        assert!(!public.is_private());

        let fresh = DsaKey::from_params(&DsaParams {
            priv_key: None,
            pub_key: None,
            ..params.clone()
        })
        .unwrap();
        assert!(fresh.is_private());
        let fresh_params = fresh.to_params();
        assert_eq!(fresh_params.p, params.p);
        assert_ne!(fresh_params.priv_key, params.priv_key);
    }

    #[test]
    fn test_params_missing_domain() {
        let params = fixture().to_params();
        let no_g = DsaParams {
            g: None,
            ..params
        };
        assert!(matches!(
            DsaKey::from_params(&no_g),
            Err(Error::InvalidParameter { name: "g", .. })
        ));
    }

    #[test]
    fn test_der_roundtrips() {
        let key = fixture();
        let pkcs8 = key.to_pkcs8_der().unwrap();
        assert_eq!(DsaKey::from_pkcs8_der(&pkcs8).unwrap().to_params(), key.to_params());

        let traditional = key.to_traditional_der().unwrap();
        assert_eq!(
            DsaKey::from_traditional_der(&traditional).unwrap().to_params(),
            key.to_params()
        );

        let spki = key.to_spki_der().unwrap();
        let public = DsaKey::from_spki_der(&spki).unwrap();
        assert!(!public.is_private());
        assert_eq!(public.to_params(), key.to_public().to_params());
    }
}

//! Key generation
//!
//! Every algorithm has a default size so that a bare algorithm name is a
//! complete request.

use tracing::info;

use crate::{
    error::{Error, Result},
    key::{Algorithm, DhKey, DsaKey, EcKey, KeyObject, RsaKey},
    params::KeyParams,
};

pub const DEFAULT_RSA_BITS: usize = 1024;
pub const DEFAULT_RSA_EXPONENT: u64 = 65537;
pub const DEFAULT_DSA_BITS: usize = 1024;
pub const DEFAULT_DH_BITS: usize = 512;
pub const DEFAULT_DH_GENERATOR: u32 = 2;

/// Generation request for one algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    Rsa { bits: usize, exponent: u64 },
    Dsa { bits: usize, seed: Option<Vec<u8>> },
    Dh { bits: usize, generator: u32 },
    /// The curve is fixed; `bits` is accepted and ignored
    Ec { bits: Option<usize> },
}

impl Default for KeySpec {
    fn default() -> Self {
        KeySpec::for_algorithm(Algorithm::Rsa)
    }
}

impl KeySpec {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Rsa => KeySpec::Rsa {
                bits: DEFAULT_RSA_BITS,
                exponent: DEFAULT_RSA_EXPONENT,
            },
            Algorithm::Dsa => KeySpec::Dsa {
                bits: DEFAULT_DSA_BITS,
                seed: None,
            },
            Algorithm::Dh => KeySpec::Dh {
                bits: DEFAULT_DH_BITS,
                generator: DEFAULT_DH_GENERATOR,
            },
            Algorithm::Ec => KeySpec::Ec { bits: None },
        }
    }

    /// Defaults for a case-insensitive algorithm name; `None` means RSA
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => Ok(Self::for_algorithm(name.parse()?)),
            None => Ok(Self::default()),
        }
    }

    pub fn with_bits(self, bits: usize) -> Self {
        match self {
            KeySpec::Rsa { exponent, .. } => KeySpec::Rsa { bits, exponent },
            KeySpec::Dsa { seed, .. } => KeySpec::Dsa { bits, seed },
            KeySpec::Dh { generator, .. } => KeySpec::Dh { bits, generator },
            KeySpec::Ec { .. } => KeySpec::Ec { bits: Some(bits) },
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeySpec::Rsa { .. } => Algorithm::Rsa,
            KeySpec::Dsa { .. } => Algorithm::Dsa,
            KeySpec::Dh { .. } => Algorithm::Dh,
            KeySpec::Ec { .. } => Algorithm::Ec,
        }
    }

    pub fn generate(&self) -> Result<KeyObject> {
        let key: KeyObject = match self {
            KeySpec::Rsa { bits, exponent } => RsaKey::generate(*bits, *exponent)?.into(),
            KeySpec::Dsa { bits, seed } => DsaKey::generate(*bits, seed.as_deref())?.into(),
            KeySpec::Dh { bits, generator } => DhKey::generate(*bits, *generator)?.into(),
            KeySpec::Ec { bits } => EcKey::generate(*bits).into(),
        };
        info!(algorithm = %key.algorithm(), bits = key.bits(), "generated key");
        Ok(key)
    }
}

/// Request accepted by [`new_key`]
#[derive(Debug, Clone)]
pub enum NewKey {
    Generate(KeySpec),
    Params(KeyParams),
}

/// Create a key, either freshly generated or from a parameter map
pub fn new_key(request: NewKey) -> Result<KeyObject> {
    match request {
        NewKey::Generate(spec) => spec.generate().map_err(Error::record),
        NewKey::Params(params) => KeyObject::from_params(&params).map_err(Error::record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::dh::tests::oakley_params;

    #[test]
    fn test_spec_defaults() {
        assert_eq!(
            KeySpec::from_name(None).unwrap(),
            KeySpec::Rsa {
                bits: 1024,
                exponent: 65537
            }
        );
        assert_eq!(
            KeySpec::from_name(Some("DH")).unwrap(),
            KeySpec::Dh {
                bits: 512,
                generator: 2
            }
        );
        assert_eq!(
            KeySpec::from_name(Some("dsa")).unwrap().with_bits(2048),
            KeySpec::Dsa {
                bits: 2048,
                seed: None
            }
        );
        assert!(matches!(
            KeySpec::from_name(Some("x448")),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_generate_rsa_default() {
        let key = new_key(NewKey::Generate(KeySpec::default())).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Rsa);
        assert_eq!(key.bits(), 1024);
        assert!(key.is_private().unwrap());
    }

    #[test]
    fn test_generate_small_dh() {
        let spec = KeySpec::Dh {
            bits: 128,
            generator: 2,
        };
        let key = new_key(NewKey::Generate(spec)).unwrap();
        assert_eq!(key.bits(), 128);
        assert!(key.is_private().unwrap());

        let too_small = KeySpec::Dh {
            bits: 32,
            generator: 2,
        };
        assert!(new_key(NewKey::Generate(too_small)).is_err());
    }

    #[test]
    fn test_generate_ec_ignores_bits() {
        let key = new_key(NewKey::Generate(KeySpec::Ec { bits: Some(1024) })).unwrap();
        assert_eq!(key.bits(), 256);
    }

    #[test]
    fn test_new_from_params() {
        let key = new_key(NewKey::Params(KeyParams::Dh(oakley_params()))).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Dh);
        assert!(key.is_private().unwrap());
    }
}

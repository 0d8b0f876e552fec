pub mod dh;
pub mod dsa;
pub mod ec;
pub mod rsa;
pub mod util;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use self::{dh::DhKey, dsa::DsaKey, ec::EcKey, rsa::RsaKey};
use crate::{
    error::{Error, Result},
    params::{KeyDetails, KeyParams},
};

// ============================================================================
// Algorithm & Privacy
// ============================================================================

/// 支持的密钥算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Rsa,
    Dsa,
    Dh,
    Ec,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Rsa, Algorithm::Dsa, Algorithm::Dh, Algorithm::Ec];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Rsa => "RSA",
            Algorithm::Dsa => "DSA",
            Algorithm::Dh => "DH",
            Algorithm::Ec => "EC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Answer to "does this key hold private material?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privacy {
    Private,
    Public,
    /// The algorithm offers no way to tell (EC)
    Indeterminate,
}

// ============================================================================
// Core Key Structure
// ============================================================================

/// Per-algorithm key material
#[derive(Clone)]
pub enum KeyMaterial {
    Rsa(RsaKey),
    Dsa(DsaKey),
    Dh(DhKey),
    Ec(EcKey),
}

/// Canonical in-memory key
///
/// Immutable once built. `Clone` copies the material, so a clone never
/// aliases the original.
#[derive(Clone)]
pub struct KeyObject {
    material: KeyMaterial,
}

impl From<KeyMaterial> for KeyObject {
    fn from(material: KeyMaterial) -> Self {
        Self { material }
    }
}

impl From<RsaKey> for KeyObject {
    fn from(value: RsaKey) -> Self {
        KeyMaterial::Rsa(value).into()
    }
}

impl From<DsaKey> for KeyObject {
    fn from(value: DsaKey) -> Self {
        KeyMaterial::Dsa(value).into()
    }
}

impl From<DhKey> for KeyObject {
    fn from(value: DhKey) -> Self {
        KeyMaterial::Dh(value).into()
    }
}

impl From<EcKey> for KeyObject {
    fn from(value: EcKey) -> Self {
        KeyMaterial::Ec(value).into()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl KeyObject {
    /// Build a key from a parameter map
    pub fn from_params(params: &KeyParams) -> Result<Self> {
        Ok(match params {
            KeyParams::Rsa(p) => RsaKey::from_params(p)?.into(),
            KeyParams::Dsa(p) => DsaKey::from_params(p)?.into(),
            KeyParams::Dh(p) => DhKey::from_params(p)?.into(),
        })
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl KeyObject {
    pub fn algorithm(&self) -> Algorithm {
        match &self.material {
            KeyMaterial::Rsa(_) => Algorithm::Rsa,
            KeyMaterial::Dsa(_) => Algorithm::Dsa,
            KeyMaterial::Dh(_) => Algorithm::Dh,
            KeyMaterial::Ec(_) => Algorithm::Ec,
        }
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    pub fn privacy(&self) -> Privacy {
        let private = match &self.material {
            KeyMaterial::Rsa(k) => k.is_private(),
            KeyMaterial::Dsa(k) => k.is_private(),
            KeyMaterial::Dh(k) => k.is_private(),
            KeyMaterial::Ec(_) => return Privacy::Indeterminate,
        };
        if private {
            Privacy::Private
        } else {
            Privacy::Public
        }
    }

    /// Definite privacy answer; EC keys yield [`Error::IndeterminatePrivacy`]
    pub fn is_private(&self) -> Result<bool> {
        match self.privacy() {
            Privacy::Private => Ok(true),
            Privacy::Public => Ok(false),
            Privacy::Indeterminate => Err(Error::IndeterminatePrivacy),
        }
    }

    /// Whether private material is actually held, EC included
    ///
    /// Used by encoders that need to pick between private and public forms.
    pub fn has_private_material(&self) -> bool {
        match &self.material {
            KeyMaterial::Rsa(k) => k.is_private(),
            KeyMaterial::Dsa(k) => k.is_private(),
            KeyMaterial::Dh(k) => k.is_private(),
            KeyMaterial::Ec(k) => k.has_secret(),
        }
    }

    /// Size of the modulus, prime or curve in bits
    pub fn bits(&self) -> usize {
        match &self.material {
            KeyMaterial::Rsa(k) => k.bits(),
            KeyMaterial::Dsa(k) => k.bits(),
            KeyMaterial::Dh(k) => k.bits(),
            KeyMaterial::Ec(_) => ec::CURVE_BITS,
        }
    }

    /// Copy of the key without any private fields
    pub fn public_key(&self) -> KeyObject {
        match &self.material {
            KeyMaterial::Rsa(k) => k.to_public().into(),
            KeyMaterial::Dsa(k) => k.to_public().into(),
            KeyMaterial::Dh(k) => k.to_public().into(),
            KeyMaterial::Ec(k) => k.to_public().into(),
        }
    }

    pub fn as_rsa(&self) -> Option<&RsaKey> {
        match &self.material {
            KeyMaterial::Rsa(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_dsa(&self) -> Option<&DsaKey> {
        match &self.material {
            KeyMaterial::Dsa(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_dh(&self) -> Option<&DhKey> {
        match &self.material {
            KeyMaterial::Dh(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_ec(&self) -> Option<&EcKey> {
        match &self.material {
            KeyMaterial::Ec(k) => Some(k),
            _ => None,
        }
    }

    /// Size, type and parameter map (none for EC)
    pub fn details(&self) -> KeyDetails {
        let params = match &self.material {
            KeyMaterial::Rsa(k) => Some(KeyParams::Rsa(k.to_params())),
            KeyMaterial::Dsa(k) => Some(KeyParams::Dsa(k.to_params())),
            KeyMaterial::Dh(k) => Some(KeyParams::Dh(k.to_params())),
            KeyMaterial::Ec(_) => None,
        };
        KeyDetails {
            bits: self.bits(),
            algorithm: self.algorithm(),
            params,
        }
    }
}

impl fmt::Display for KeyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keyseal.pkey:{}:{:p}", self.algorithm(), self)
    }
}

impl fmt::Debug for KeyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyObject")
            .field("algorithm", &self.algorithm())
            .field("bits", &self.bits())
            .field("privacy", &self.privacy())
            .finish_non_exhaustive()
    }
}

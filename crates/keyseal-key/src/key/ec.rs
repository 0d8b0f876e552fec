use p256::{
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
    PublicKey, SecretKey,
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Only named curve offered for EC keys
pub const CURVE_NAME: &str = "prime256v1";
pub const CURVE_BITS: usize = 256;

/// EC key material on P-256
#[derive(Clone)]
pub struct EcKey {
    public: PublicKey,
    secret: Option<SecretKey>,
}

impl From<SecretKey> for EcKey {
    fn from(value: SecretKey) -> Self {
        Self {
            public: value.public_key(),
            secret: Some(value),
        }
    }
}

impl From<PublicKey> for EcKey {
    fn from(value: PublicKey) -> Self {
        Self {
            public: value,
            secret: None,
        }
    }
}

impl EcKey {
    /// Generate a key pair; the requested size is not consulted
    pub fn generate(bits: Option<usize>) -> Self {
        if let Some(bits) = bits.filter(|b| *b != CURVE_BITS) {
            debug!(bits, curve = CURVE_NAME, "EC key size ignored");
        }
        SecretKey::random(&mut rand::thread_rng()).into()
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_pkcs8_der(der)
            .map_err(|e| Error::ImportError(format!("EC PKCS8 DER import failed: {}", e)))?;
        Ok(secret.into())
    }

    /// Import the SEC1 `ECPrivateKey` structure
    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_sec1_der(der)
            .map_err(|e| Error::ImportError(format!("EC SEC1 DER import failed: {}", e)))?;
        Ok(secret.into())
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let public = PublicKey::from_public_key_der(der)
            .map_err(|e| Error::ImportError(format!("EC SPKI DER import failed: {}", e)))?;
        Ok(public.into())
    }
}

impl EcKey {
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.secret.as_ref()
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    pub fn to_public(&self) -> Self {
        self.public.into()
    }

    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let secret = self.secret.as_ref().ok_or(Error::NotPrivateKey)?;
        let doc = secret
            .to_pkcs8_der()
            .map_err(|e| Error::ExportError(format!("EC PKCS8 export failed: {}", e)))?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .public
            .to_public_key_der()
            .map_err(|e| Error::ExportError(format!("EC SPKI export failed: {}", e)))?;
        Ok(doc.as_bytes().to_vec())
    }
}

//! Seal/open entry point bound to the configured default cipher

use keyseal_crypto::{Cipher, CipherSelector};
use keyseal_key::KeyObject;

use crate::{decapsulator, encapsulator, error::Result, keyring::SealedEnvelope, settings::Settings};

/// Digital envelope engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Envelope {
    default_cipher: Cipher,
}

impl Envelope {
    pub fn new(default_cipher: Cipher) -> Self {
        Self { default_cipher }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_cipher())
    }

    pub fn default_cipher(&self) -> Cipher {
        self.default_cipher
    }

    fn cipher(&self, cipher: Option<CipherSelector<'_>>) -> Result<Cipher> {
        match cipher {
            Some(selector) => Ok(selector.resolve()?),
            None => Ok(self.default_cipher),
        }
    }

    /// Seal `data` for `recipients`; see [`encapsulator::seal`]
    pub fn seal(
        &self,
        data: &[u8],
        recipients: &[&KeyObject],
        cipher: Option<CipherSelector<'_>>,
    ) -> Result<Option<SealedEnvelope>> {
        encapsulator::seal(data, recipients, self.cipher(cipher)?)
    }

    /// Open with one recipient's wrapped key; see [`decapsulator::open`]
    pub fn open(
        &self,
        data: &[u8],
        encrypted_key: &[u8],
        key: &KeyObject,
        cipher: Option<CipherSelector<'_>>,
    ) -> Result<Option<Vec<u8>>> {
        decapsulator::open(data, encrypted_key, key, self.cipher(cipher)?)
    }

    /// Open the `index`-th recipient's view of a sealed envelope
    pub fn open_envelope(
        &self,
        envelope: &SealedEnvelope,
        index: usize,
        key: &KeyObject,
        cipher: Option<CipherSelector<'_>>,
    ) -> Result<Option<Vec<u8>>> {
        let encrypted_key = envelope.encrypted_keys.get(index).ok_or_else(|| {
            crate::error::CoreError::EnvelopeError(format!(
                "no wrapped key for recipient {} ({} present)",
                index,
                envelope.encrypted_keys.len()
            ))
        })?;
        self.open(&envelope.data, encrypted_key, key, cipher)
    }
}

//! Symmetric cipher registry used by the envelope engine
//!
//! Covers the stream cipher RC4 and the CBC block ciphers (PKCS#7 padding).

use std::{fmt, str::FromStr};

use aes::{Aes128, Aes192, Aes256};
use cipher::{
    block_padding::Pkcs7, consts::U16, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit,
    KeyIvInit, StreamCipher,
};
use des::TdesEde3;
use rand::RngCore;
use rc4::Rc4;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported envelope ciphers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cipher {
    /// RC4 with a 128-bit key. Weak; kept as the legacy envelope default.
    #[default]
    #[serde(rename = "rc4")]
    Rc4,
    #[serde(rename = "des-ede3-cbc")]
    DesEde3Cbc,
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-192-cbc")]
    Aes192Cbc,
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
}

impl Cipher {
    pub const ALL: [Cipher; 5] = [
        Cipher::Rc4,
        Cipher::DesEde3Cbc,
        Cipher::Aes128Cbc,
        Cipher::Aes192Cbc,
        Cipher::Aes256Cbc,
    ];

    /// Look up a cipher by name (case-insensitive, a few common aliases)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rc4" => Some(Cipher::Rc4),
            "des-ede3-cbc" | "des3" => Some(Cipher::DesEde3Cbc),
            "aes-128-cbc" | "aes128" => Some(Cipher::Aes128Cbc),
            "aes-192-cbc" | "aes192" => Some(Cipher::Aes192Cbc),
            "aes-256-cbc" | "aes256" => Some(Cipher::Aes256Cbc),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cipher::Rc4 => "rc4",
            Cipher::DesEde3Cbc => "des-ede3-cbc",
            Cipher::Aes128Cbc => "aes-128-cbc",
            Cipher::Aes192Cbc => "aes-192-cbc",
            Cipher::Aes256Cbc => "aes-256-cbc",
        }
    }

    pub fn key_len(&self) -> usize {
        match self {
            Cipher::Rc4 | Cipher::Aes128Cbc => 16,
            Cipher::DesEde3Cbc | Cipher::Aes192Cbc => 24,
            Cipher::Aes256Cbc => 32,
        }
    }

    /// IV length in bytes; zero for the stream cipher
    pub fn iv_len(&self) -> usize {
        match self {
            Cipher::Rc4 => 0,
            Cipher::DesEde3Cbc => 8,
            Cipher::Aes128Cbc | Cipher::Aes192Cbc | Cipher::Aes256Cbc => 16,
        }
    }

    /// Fresh random content key
    pub fn generate_key(&self) -> Zeroizing<Vec<u8>> {
        let mut key = Zeroizing::new(vec![0u8; self.key_len()]);
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    /// Fresh random IV (empty for RC4)
    pub fn generate_iv(&self) -> Vec<u8> {
        let mut iv = vec![0u8; self.iv_len()];
        rand::thread_rng().fill_bytes(&mut iv);
        iv
    }

    /// Encrypt `data` in one pass
    ///
    /// # Arguments
    /// * `key` - Exactly `key_len()` bytes
    /// * `iv` - Exactly `iv_len()` bytes
    /// * `data` - Plaintext
    pub fn encrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        self.check_lengths(key, iv)?;
        match self {
            Cipher::Rc4 => rc4_apply(key, data),
            Cipher::DesEde3Cbc => cbc_encrypt::<TdesEde3>(key, iv, data),
            Cipher::Aes128Cbc => cbc_encrypt::<Aes128>(key, iv, data),
            Cipher::Aes192Cbc => cbc_encrypt::<Aes192>(key, iv, data),
            Cipher::Aes256Cbc => cbc_encrypt::<Aes256>(key, iv, data),
        }
    }

    /// Decrypt `data` in one pass; a bad block padding is an error
    pub fn decrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        self.check_lengths(key, iv)?;
        match self {
            Cipher::Rc4 => rc4_apply(key, data),
            Cipher::DesEde3Cbc => cbc_decrypt::<TdesEde3>(key, iv, data),
            Cipher::Aes128Cbc => cbc_decrypt::<Aes128>(key, iv, data),
            Cipher::Aes192Cbc => cbc_decrypt::<Aes192>(key, iv, data),
            Cipher::Aes256Cbc => cbc_decrypt::<Aes256>(key, iv, data),
        }
    }

    fn check_lengths(&self, key: &[u8], iv: &[u8]) -> Result<()> {
        if key.len() != self.key_len() {
            return Err(Error::InvalidKeyLength {
                expected: self.key_len(),
                actual: key.len(),
            });
        }
        if iv.len() != self.iv_len() {
            return Err(Error::CipherError(format!(
                "{} expects a {}-byte IV, got {}",
                self.name(),
                self.iv_len(),
                iv.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cipher {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Cipher::from_name(s).ok_or_else(|| Error::UnknownCipher(s.to_string()))
    }
}

fn rc4_apply(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut rc4 = Rc4::<U16>::new_from_slice(key)
        .map_err(|e| Error::CipherError(format!("RC4 key setup failed: {}", e)))?;
    let mut buf = data.to_vec();
    rc4.apply_keystream(&mut buf);
    Ok(buf)
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher,
    cbc::Encryptor<C>: KeyIvInit,
{
    let enc = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| Error::CipherError(format!("CBC setup failed: {}", e)))?;
    Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher,
    cbc::Decryptor<C>: KeyIvInit,
{
    let dec = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| Error::CipherError(format!("CBC setup failed: {}", e)))?;
    dec.decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|e| Error::CipherError(format!("CBC decryption failed: {}", e)))
}

// ============================================================================
// Selection by name or handle
// ============================================================================

/// A cipher given either by name or by an already resolved handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSelector<'a> {
    Name(&'a str),
    Handle(Cipher),
}

impl CipherSelector<'_> {
    pub fn resolve(&self) -> Result<Cipher> {
        match self {
            CipherSelector::Name(name) => name.parse(),
            CipherSelector::Handle(cipher) => Ok(*cipher),
        }
    }
}

impl<'a> From<&'a str> for CipherSelector<'a> {
    fn from(value: &'a str) -> Self {
        CipherSelector::Name(value)
    }
}

impl From<Cipher> for CipherSelector<'_> {
    fn from(value: Cipher) -> Self {
        CipherSelector::Handle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_ciphers() {
        let data = b"The quick brown fox jumps over the lazy dog";
        for cipher in Cipher::ALL {
            let key = cipher.generate_key();
            let iv = cipher.generate_iv();
            let ct = cipher.encrypt(&key, &iv, data).unwrap();
            assert_ne!(ct.as_slice(), data.as_slice(), "{}", cipher);
            let pt = cipher.decrypt(&key, &iv, &ct).unwrap();
            assert_eq!(pt.as_slice(), data.as_slice(), "{}", cipher);
        }
    }

    #[test]
    fn test_rc4_known_vector() {
        // RFC 6229, 128-bit key 0x0102..10, first keystream bytes
        let key: Vec<u8> = (1u8..=16).collect();
        let ks = Cipher::Rc4.encrypt(&key, &[], &[0u8; 8]).unwrap();
        assert_eq!(hex::encode(ks), "9ac7cc9a609d1ef7");
    }

    #[test]
    fn test_block_output_is_padded() {
        let cipher = Cipher::Aes128Cbc;
        let key = cipher.generate_key();
        let iv = cipher.generate_iv();
        assert_eq!(cipher.encrypt(&key, &iv, &[]).unwrap().len(), 16);
        assert_eq!(cipher.encrypt(&key, &iv, &[0u8; 16]).unwrap().len(), 32);
        assert!(Cipher::Rc4.encrypt(&Cipher::Rc4.generate_key(), &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_lengths() {
        let cipher = Cipher::Aes256Cbc;
        let err = cipher.encrypt(&[0u8; 16], &[0u8; 16], b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidKeyLength { expected: 32, actual: 16 }));
        assert!(cipher.encrypt(&[0u8; 32], &[0u8; 8], b"x").is_err());
    }

    #[test]
    fn test_wrong_key_fails_padding() {
        let cipher = Cipher::DesEde3Cbc;
        let iv = cipher.generate_iv();
        let ct = cipher.encrypt(&cipher.generate_key(), &iv, b"secret message").unwrap();
        // A wrong key almost always produces invalid padding; if it happens to
        // unpad, the plaintext still differs.
        match cipher.decrypt(&cipher.generate_key(), &iv, &ct) {
            Ok(pt) => assert_ne!(pt.as_slice(), b"secret message".as_slice()),
            Err(e) => assert!(matches!(e, Error::CipherError(_))),
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Cipher::from_name("RC4"), Some(Cipher::Rc4));
        assert_eq!(Cipher::from_name("des3"), Some(Cipher::DesEde3Cbc));
        assert_eq!(Cipher::from_name("AES-256-CBC"), Some(Cipher::Aes256Cbc));
        assert!(Cipher::from_name("aes-256-gcm").is_none());
        assert!(matches!(
            CipherSelector::from("bf-cbc").resolve(),
            Err(Error::UnknownCipher(_))
        ));
        for cipher in Cipher::ALL {
            assert_eq!(cipher.name().parse::<Cipher>().unwrap(), cipher);
        }
    }
}

//! Message digest registry
//!
//! Digests are resolved by name (case-insensitive, `-`/`_` ignored) into a
//! closed set of handles. Resolution never panics: an unknown name is `None`.

use std::{fmt, str::FromStr};

use digest::DynDigest;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Digest Handles
// ============================================================================

/// Supported message digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageDigest {
    Md5,
    /// SHA-1 (20-byte output), the signature default
    #[default]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl MessageDigest {
    pub const ALL: [MessageDigest; 6] = [
        MessageDigest::Md5,
        MessageDigest::Sha1,
        MessageDigest::Sha224,
        MessageDigest::Sha256,
        MessageDigest::Sha384,
        MessageDigest::Sha512,
    ];

    /// Look up a digest by name
    ///
    /// # Example
    /// ```
    /// use keyseal_crypto::hash::MessageDigest;
    ///
    /// assert_eq!(MessageDigest::from_name("SHA-256"), Some(MessageDigest::Sha256));
    /// assert_eq!(MessageDigest::from_name("whirlpool"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "md5" => Some(MessageDigest::Md5),
            "sha1" => Some(MessageDigest::Sha1),
            "sha224" => Some(MessageDigest::Sha224),
            "sha256" => Some(MessageDigest::Sha256),
            "sha384" => Some(MessageDigest::Sha384),
            "sha512" => Some(MessageDigest::Sha512),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageDigest::Md5 => "md5",
            MessageDigest::Sha1 => "sha1",
            MessageDigest::Sha224 => "sha224",
            MessageDigest::Sha256 => "sha256",
            MessageDigest::Sha384 => "sha384",
            MessageDigest::Sha512 => "sha512",
        }
    }

    /// Output length in bytes
    pub fn output_size(&self) -> usize {
        match self {
            MessageDigest::Md5 => 16,
            MessageDigest::Sha1 => 20,
            MessageDigest::Sha224 => 28,
            MessageDigest::Sha256 => 32,
            MessageDigest::Sha384 => 48,
            MessageDigest::Sha512 => 64,
        }
    }

    /// Fresh streaming context for this digest
    pub fn hasher(&self) -> Box<dyn DynDigest> {
        match self {
            MessageDigest::Md5 => Box::new(md5::Md5::default()),
            MessageDigest::Sha1 => Box::new(sha1::Sha1::default()),
            MessageDigest::Sha224 => Box::new(sha2::Sha224::default()),
            MessageDigest::Sha256 => Box::new(sha2::Sha256::default()),
            MessageDigest::Sha384 => Box::new(sha2::Sha384::default()),
            MessageDigest::Sha512 => Box::new(sha2::Sha512::default()),
        }
    }

    /// One-shot digest of `data`
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize().into_vec()
    }
}

impl fmt::Display for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageDigest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MessageDigest::from_name(s).ok_or_else(|| Error::UnknownDigest(s.to_string()))
    }
}

// ============================================================================
// Selection by name or handle
// ============================================================================

/// A digest given either by name or by an already resolved handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestSelector<'a> {
    Name(&'a str),
    Handle(MessageDigest),
}

impl DigestSelector<'_> {
    /// Resolve to a handle; an unknown name is an error
    pub fn resolve(&self) -> Result<MessageDigest> {
        match self {
            DigestSelector::Name(name) => name.parse(),
            DigestSelector::Handle(md) => Ok(*md),
        }
    }
}

impl<'a> From<&'a str> for DigestSelector<'a> {
    fn from(value: &'a str) -> Self {
        DigestSelector::Name(value)
    }
}

impl From<MessageDigest> for DigestSelector<'_> {
    fn from(value: MessageDigest) -> Self {
        DigestSelector::Handle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        assert_eq!(MessageDigest::from_name("sha1"), Some(MessageDigest::Sha1));
        assert_eq!(MessageDigest::from_name("SHA1"), Some(MessageDigest::Sha1));
        assert_eq!(MessageDigest::from_name("sha_512"), Some(MessageDigest::Sha512));
        assert_eq!(MessageDigest::from_name("MD5"), Some(MessageDigest::Md5));
        assert!(MessageDigest::from_name("").is_none());
        assert!(MessageDigest::from_name("ripemd160").is_none());
    }

    #[test]
    fn test_output_sizes_match_hashers() {
        for md in MessageDigest::ALL {
            assert_eq!(md.digest(b"abc").len(), md.output_size(), "{}", md);
            assert_eq!(MessageDigest::from_name(md.name()), Some(md));
        }
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            hex::encode(MessageDigest::Md5.digest(b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hex::encode(MessageDigest::Sha1.digest(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex::encode(MessageDigest::Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut hasher = MessageDigest::Sha384.hasher();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(
            hasher.finalize().into_vec(),
            MessageDigest::Sha384.digest(b"hello world")
        );
    }

    #[test]
    fn test_selector() {
        assert_eq!(
            DigestSelector::from("sha256").resolve().unwrap(),
            MessageDigest::Sha256
        );
        assert_eq!(
            DigestSelector::from(MessageDigest::Md5).resolve().unwrap(),
            MessageDigest::Md5
        );
        assert!(matches!(
            DigestSelector::from("nope").resolve(),
            Err(Error::UnknownDigest(_))
        ));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&MessageDigest::Sha224).unwrap();
        assert_eq!(json, "\"sha224\"");
    }
}

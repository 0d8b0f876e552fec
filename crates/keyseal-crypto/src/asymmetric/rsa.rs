//! Raw RSA operations with selectable padding
//!
//! The four textbook directions (public encrypt, private decrypt, private
//! encrypt, public decrypt) with the padding schemes a caller can name.
//! Every output is left-padded to the modulus size.

use std::{fmt, str::FromStr};

use num_bigint_dig::BigUint;
use rand::Rng;
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey,
};
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Minimum padding overhead of the PKCS#1 v1.5 and SSLv23 schemes
const PKCS1_OVERHEAD: usize = 11;

/// RSA padding modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// PKCS#1 v1.5 (type 2 for encryption, type 1 for private encryption)
    #[default]
    Pkcs1,
    /// PKCS#1 v1.5 type 2 with the SSLv3 rollback marker
    SslV23,
    /// No padding; input must be exactly the modulus size
    NoPadding,
    /// OAEP with SHA-1 and MGF1-SHA-1
    Oaep,
    /// ANSI X9.31, private encryption and public decryption only
    X931,
    /// Accepted as a name, rejected by every raw operation
    Pss,
}

impl Padding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pkcs1" => Some(Padding::Pkcs1),
            "sslv23" => Some(Padding::SslV23),
            "no" | "none" => Some(Padding::NoPadding),
            "oaep" => Some(Padding::Oaep),
            "x931" => Some(Padding::X931),
            "pss" => Some(Padding::Pss),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Padding::Pkcs1 => "pkcs1",
            Padding::SslV23 => "sslv23",
            Padding::NoPadding => "no",
            Padding::Oaep => "oaep",
            Padding::X931 => "x931",
            Padding::Pss => "pss",
        }
    }

    fn unsupported(self, operation: &'static str) -> Error {
        Error::UnsupportedPadding {
            padding: self.name(),
            operation,
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Padding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Padding::from_name(s).ok_or_else(|| Error::UnknownPadding(s.to_string()))
    }
}

// ============================================================================
// Public key operations
// ============================================================================

/// Encrypt with the public key
pub fn public_encrypt(key: &RsaPublicKey, data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let k = key.size();
    match padding {
        Padding::Pkcs1 => Ok(key.encrypt(&mut rng, Pkcs1v15Encrypt, data)?),
        Padding::Oaep => Ok(key.encrypt(&mut rng, Oaep::new::<Sha1>(), data)?),
        Padding::SslV23 => {
            let em = pad_type2(data, k, true)?;
            raw_public(key, &em)
        }
        Padding::NoPadding => {
            if data.len() != k {
                return Err(Error::PaddingError(format!(
                    "unpadded input must be {} bytes, got {}",
                    k,
                    data.len()
                )));
            }
            raw_public(key, data)
        }
        Padding::X931 | Padding::Pss => Err(padding.unsupported("public encrypt")),
    }
}

/// Decrypt with the public key, reversing a private-key encryption
pub fn public_decrypt(key: &RsaPublicKey, data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    let k = key.size();
    match padding {
        Padding::Pkcs1 => {
            let em = raw_public(key, data)?;
            unpad_type1(&em)
        }
        Padding::NoPadding => raw_public(key, data),
        Padding::X931 => {
            let c = input_to_int(key.n(), data)?;
            let mut m = c.modpow(key.e(), key.n());
            // X9.31 representatives end in 0x_C; otherwise the signer sent n - m
            if m.to_bytes_be().last().map(|b| b & 0x0f) != Some(0x0c) {
                m = key.n() - m;
            }
            unpad_x931(&to_fixed_be(&m, k))
        }
        Padding::SslV23 | Padding::Oaep | Padding::Pss => {
            Err(padding.unsupported("public decrypt"))
        }
    }
}

// ============================================================================
// Private key operations
// ============================================================================

/// Decrypt with the private key
pub fn private_decrypt(key: &RsaPrivateKey, data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    match padding {
        Padding::Pkcs1 => Ok(key.decrypt(Pkcs1v15Encrypt, data)?),
        Padding::Oaep => Ok(key.decrypt(Oaep::new::<Sha1>(), data)?),
        Padding::SslV23 => {
            let em = Zeroizing::new(raw_private(key, data)?);
            unpad_type2(&em, true)
        }
        Padding::NoPadding => raw_private(key, data),
        Padding::X931 | Padding::Pss => Err(padding.unsupported("private decrypt")),
    }
}

/// Encrypt with the private key (type 1 or X9.31 signature-style padding)
pub fn private_encrypt(key: &RsaPrivateKey, data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    let k = key.size();
    match padding {
        Padding::Pkcs1 => Ok(key.sign(Pkcs1v15Sign::new_unprefixed(), data)?),
        Padding::NoPadding => {
            if data.len() != k {
                return Err(Error::PaddingError(format!(
                    "unpadded input must be {} bytes, got {}",
                    k,
                    data.len()
                )));
            }
            raw_private(key, data)
        }
        Padding::X931 => {
            let em = pad_x931(data, k)?;
            let m = input_to_int(key.n(), &em)?;
            let s = m.modpow(key.d(), key.n());
            let alt = key.n() - &s;
            Ok(to_fixed_be(if s > alt { &alt } else { &s }, k))
        }
        Padding::SslV23 | Padding::Oaep | Padding::Pss => {
            Err(padding.unsupported("private encrypt"))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Big-endian encoding left-padded with zeros to `len` bytes
pub fn to_fixed_be(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() >= len {
        return bytes;
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

fn input_to_int(n: &BigUint, data: &[u8]) -> Result<BigUint> {
    let k = (n.bits() + 7) / 8;
    if data.len() > k {
        return Err(Error::DataTooLarge(data.len()));
    }
    let value = BigUint::from_bytes_be(data);
    if &value >= n {
        return Err(Error::DataTooLarge(data.len()));
    }
    Ok(value)
}

fn raw_public(key: &RsaPublicKey, data: &[u8]) -> Result<Vec<u8>> {
    let m = input_to_int(key.n(), data)?;
    Ok(to_fixed_be(&m.modpow(key.e(), key.n()), key.size()))
}

fn raw_private(key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>> {
    let c = input_to_int(key.n(), data)?;
    let m = Zeroizing::new(c.modpow(key.d(), key.n()));
    Ok(to_fixed_be(&m, key.size()))
}

/// `00 02 PS 00 data`; with `sslv23` the last eight PS bytes are 0x03
fn pad_type2(data: &[u8], k: usize, sslv23: bool) -> Result<Vec<u8>> {
    if data.len() + PKCS1_OVERHEAD > k {
        return Err(Error::DataTooLarge(data.len()));
    }
    let ps_len = k - 3 - data.len();
    let mut rng = rand::thread_rng();
    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.push(0x02);
    for _ in 0..ps_len {
        em.push(rng.gen_range(1..=255u8));
    }
    if sslv23 {
        let end = em.len();
        em[end - 8..end].fill(0x03);
    }
    em.push(0x00);
    em.extend_from_slice(data);
    Ok(em)
}

fn unpad_type2(em: &[u8], sslv23: bool) -> Result<Vec<u8>> {
    if em.len() < PKCS1_OVERHEAD || em[0] != 0x00 || em[1] != 0x02 {
        return Err(Error::PaddingError("block type is not 02".to_string()));
    }
    let sep = em[2..]
        .iter()
        .position(|b| *b == 0x00)
        .map(|i| i + 2)
        .ok_or_else(|| Error::PaddingError("null separator not found".to_string()))?;
    if sep < 10 {
        return Err(Error::PaddingError("padding string too short".to_string()));
    }
    if sslv23 && em[sep - 8..sep].iter().all(|b| *b == 0x03) {
        return Err(Error::PaddingError("SSLv3 rollback marker present".to_string()));
    }
    Ok(em[sep + 1..].to_vec())
}

fn unpad_type1(em: &[u8]) -> Result<Vec<u8>> {
    if em.len() < PKCS1_OVERHEAD || em[0] != 0x00 || em[1] != 0x01 {
        return Err(Error::PaddingError("block type is not 01".to_string()));
    }
    let mut i = 2;
    while i < em.len() && em[i] == 0xff {
        i += 1;
    }
    if i == em.len() || em[i] != 0x00 {
        return Err(Error::PaddingError("bad type 1 padding".to_string()));
    }
    if i - 2 < 8 {
        return Err(Error::PaddingError("padding string too short".to_string()));
    }
    Ok(em[i + 1..].to_vec())
}

/// `6A data CC` or `6B BB..BB BA data CC`
fn pad_x931(data: &[u8], k: usize) -> Result<Vec<u8>> {
    if data.len() + 2 > k {
        return Err(Error::DataTooLarge(data.len()));
    }
    let j = k - data.len() - 2;
    let mut em = Vec::with_capacity(k);
    if j == 0 {
        em.push(0x6a);
    } else {
        em.push(0x6b);
        em.extend(std::iter::repeat(0xbb).take(j - 1));
        em.push(0xba);
    }
    em.extend_from_slice(data);
    em.push(0xcc);
    Ok(em)
}

fn unpad_x931(em: &[u8]) -> Result<Vec<u8>> {
    if em.len() < 2 || em[em.len() - 1] != 0xcc {
        return Err(Error::PaddingError("invalid X9.31 trailer".to_string()));
    }
    let body = &em[..em.len() - 1];
    match body[0] {
        0x6a => Ok(body[1..].to_vec()),
        0x6b => {
            let mut i = 1;
            while i < body.len() && body[i] == 0xbb {
                i += 1;
            }
            if i == body.len() || body[i] != 0xba {
                return Err(Error::PaddingError("invalid X9.31 padding".to_string()));
            }
            Ok(body[i + 1..].to_vec())
        }
        _ => Err(Error::PaddingError("invalid X9.31 header".to_string())),
    }
}

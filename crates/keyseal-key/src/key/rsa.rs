use keyseal_crypto::BigUint;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
    traits::{PrivateKeyParts, PublicKeyParts},
    RsaPrivateKey, RsaPublicKey,
};
use tracing::debug;
use zeroize::Zeroizing;

use super::util::{bn_from_hex, bn_to_hex, opt_bn};
use crate::{
    error::{Error, Result},
    params::RsaParams,
};

// ============================================================================
// Core Key Structure
// ============================================================================

/// RSA key material
///
/// The public half is always present; the private half carries `d` and both
/// primes (CRT values are derived), so a key is private exactly when the
/// private half exists.
#[derive(Clone)]
pub struct RsaKey {
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl From<RsaPrivateKey> for RsaKey {
    fn from(value: RsaPrivateKey) -> Self {
        Self {
            public: value.to_public_key(),
            private: Some(value),
        }
    }
}

impl From<RsaPublicKey> for RsaKey {
    fn from(value: RsaPublicKey) -> Self {
        Self {
            public: value,
            private: None,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl RsaKey {
    /// Generate a new key pair
    ///
    /// # Arguments
    /// * `bits` - Modulus size
    /// * `exponent` - Public exponent (65537 by default at the API surface)
    pub fn generate(bits: usize, exponent: u64) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new_with_exp(&mut rng, bits, &BigUint::from(exponent))
            .map_err(|e| Error::KeyError(format!("RSA-{} generation failed: {}", bits, e)))?;
        debug!(bits, exponent, "generated RSA key");
        Ok(private.into())
    }

    /// Build from a hex parameter map
    ///
    /// `n`, `e` and `d` are required. `p` and `q` must come together; when
    /// both are absent they are recovered from `n`, `e`, `d`. Supplied CRT
    /// values must agree with the ones derived from the primes.
    pub fn from_params(params: &RsaParams) -> Result<Self> {
        let n = required("n", params.n.as_ref())?;
        let e = required("e", params.e.as_ref())?;
        let d = required("d", params.d.as_ref())?;
        check_ranges(&n, &e, &d)?;

        let (p, q) = match (opt_bn("p", params.p.as_ref())?, opt_bn("q", params.q.as_ref())?) {
            (Some(p), Some(q)) => {
                let two = BigUint::from(2u32);
                if p < two || q < two || &p * &q != n {
                    return Err(Error::invalid("p", "p * q does not equal n"));
                }
                (p, q)
            }
            (None, None) => recover_primes(&n, &e, &d)?,
            (Some(_), None) => return Err(Error::invalid("q", "p given without q")),
            (None, Some(_)) => return Err(Error::invalid("p", "q given without p")),
        };

        let mut private = RsaPrivateKey::from_components(n, e, d, vec![p, q])
            .map_err(|e| Error::invalid("n", format!("inconsistent RSA components: {}", e)))?;
        private
            .validate()
            .map_err(|e| Error::invalid("d", format!("RSA key check failed: {}", e)))?;
        private
            .precompute()
            .map_err(|e| Error::KeyError(format!("RSA precomputation failed: {}", e)))?;

        let key = RsaKey::from(private);
        if let Some(crt) = key.crt_values() {
            check_supplied("dmp1", params.dmp1.as_ref(), &crt.0)?;
            check_supplied("dmq1", params.dmq1.as_ref(), &crt.1)?;
            check_supplied("iqmp", params.iqmp.as_ref(), &crt.2)?;
        }
        Ok(key)
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| Error::ImportError(format!("RSA PKCS8 DER import failed: {}", e)))?;
        Ok(private.into())
    }

    /// Import a PKCS#1 `RSAPrivateKey`
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| Error::ImportError(format!("RSA PKCS1 DER import failed: {}", e)))?;
        Ok(private.into())
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let public = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| Error::ImportError(format!("RSA SPKI DER import failed: {}", e)))?;
        Ok(public.into())
    }

    /// Import a PKCS#1 `RSAPublicKey`
    pub fn from_pkcs1_public_der(der: &[u8]) -> Result<Self> {
        let public = RsaPublicKey::from_pkcs1_der(der)
            .map_err(|e| Error::ImportError(format!("RSA PKCS1 public import failed: {}", e)))?;
        Ok(public.into())
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl RsaKey {
    pub fn public(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn private(&self) -> Option<&RsaPrivateKey> {
        self.private.as_ref()
    }

    pub fn is_private(&self) -> bool {
        self.private.is_some()
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    /// Modulus size in bytes
    pub fn size(&self) -> usize {
        self.public.size()
    }

    /// Copy without the private half
    pub fn to_public(&self) -> Self {
        self.public.clone().into()
    }

    /// `(dmp1, dmq1, iqmp)` derived from `d` and the primes
    fn crt_values(&self) -> Option<(BigUint, BigUint, BigUint)> {
        let private = self.private.as_ref()?;
        let primes = private.primes();
        if primes.len() < 2 {
            return None;
        }
        let (p, q) = (&primes[0], &primes[1]);
        let one = BigUint::from(1u32);
        let dmp1 = private.d() % (p - &one);
        let dmq1 = private.d() % (q - &one);
        // p is prime, so q^(p-2) is the inverse of q mod p
        let iqmp = q.modpow(&(p - BigUint::from(2u32)), p);
        Some((dmp1, dmq1, iqmp))
    }

    /// Parameter map with every present component in uppercase hex
    pub fn to_params(&self) -> RsaParams {
        let mut params = RsaParams {
            n: Some(bn_to_hex(self.public.n())),
            e: Some(bn_to_hex(self.public.e())),
            ..Default::default()
        };
        if let Some(private) = &self.private {
            let primes = private.primes();
            params.d = Some(bn_to_hex(private.d()));
            params.p = primes.first().map(bn_to_hex);
            params.q = primes.get(1).map(bn_to_hex);
            if let Some((dmp1, dmq1, iqmp)) = self.crt_values() {
                params.dmp1 = Some(bn_to_hex(&dmp1));
                params.dmq1 = Some(bn_to_hex(&dmq1));
                params.iqmp = Some(bn_to_hex(&iqmp));
            }
        }
        params
    }
}

// ============================================================================
// Export
// ============================================================================

impl RsaKey {
    /// PKCS#8 `PrivateKeyInfo` DER
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let private = self.private.as_ref().ok_or(Error::NotPrivateKey)?;
        let doc = private
            .to_pkcs8_der()
            .map_err(|e| Error::ExportError(format!("RSA PKCS8 export failed: {}", e)))?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    /// PKCS#1 `RSAPrivateKey` DER
    pub fn to_pkcs1_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let private = self.private.as_ref().ok_or(Error::NotPrivateKey)?;
        let doc = private
            .to_pkcs1_der()
            .map_err(|e| Error::ExportError(format!("RSA PKCS1 export failed: {}", e)))?;
        Ok(Zeroizing::new(doc.as_bytes().to_vec()))
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .public
            .to_public_key_der()
            .map_err(|e| Error::ExportError(format!("RSA SPKI export failed: {}", e)))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// PKCS#1 `RSAPublicKey` DER
    pub fn to_pkcs1_public_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .public
            .to_pkcs1_der()
            .map_err(|e| Error::ExportError(format!("RSA PKCS1 public export failed: {}", e)))?;
        Ok(doc.as_bytes().to_vec())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn required(name: &'static str, value: Option<&String>) -> Result<BigUint> {
    match value {
        Some(hex) => bn_from_hex(name, hex),
        None => Err(Error::invalid(name, "required RSA component is missing")),
    }
}

/// Bounds every `(n, e, d)` triple must meet before any arithmetic on it
fn check_ranges(n: &BigUint, e: &BigUint, d: &BigUint) -> Result<()> {
    let zero = BigUint::from(0u32);
    if n < &BigUint::from(3u32) || n % 2u32 == zero {
        return Err(Error::invalid("n", "modulus must be odd and at least 3"));
    }
    if e < &BigUint::from(3u32) || e >= n {
        return Err(Error::invalid("e", "public exponent out of range"));
    }
    if d < &BigUint::from(2u32) || d >= n {
        return Err(Error::invalid("d", "private exponent out of range"));
    }
    Ok(())
}

fn check_supplied(name: &'static str, supplied: Option<&String>, computed: &BigUint) -> Result<()> {
    match supplied {
        Some(hex) if bn_from_hex(name, hex)? != *computed => Err(Error::invalid(
            name,
            "does not match the value derived from the primes",
        )),
        _ => Ok(()),
    }
}

fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let zero = BigUint::from(0u32);
    let (mut a, mut b) = (a.clone(), b.clone());
    while b != zero {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Factor `n` from a consistent `(n, e, d)` triple
///
/// Callers must have passed [`check_ranges`], so `d*e - 1 >= 5`.
fn recover_primes(n: &BigUint, e: &BigUint, d: &BigUint) -> Result<(BigUint, BigUint)> {
    let one = BigUint::from(1u32);
    let zero = BigUint::from(0u32);
    let two = BigUint::from(2u32);
    let n_minus_1 = n - &one;

    // d*e - 1 = 2^s * t with t odd
    let k = d * e - &one;
    if &k % &two != zero {
        return Err(Error::invalid("d", "d*e - 1 must be even"));
    }
    let mut t = k.clone();
    let mut s = 0usize;
    while t != zero && &t % &two == zero {
        t >>= 1usize;
        s += 1;
    }

    for g in 2u32..100 {
        let mut x = BigUint::from(g).modpow(&t, n);
        if x == one || x == n_minus_1 {
            continue;
        }
        for _ in 0..s {
            let y = x.modpow(&two, n);
            if y == one {
                let p = gcd(&(&x - &one), n);
                if p > one && &p < n {
                    let q = n / &p;
                    return Ok((p, q));
                }
                break;
            }
            if y == n_minus_1 {
                break;
            }
            x = y;
        }
    }
    Err(Error::invalid("d", "cannot recover primes from n, e, d"))
}

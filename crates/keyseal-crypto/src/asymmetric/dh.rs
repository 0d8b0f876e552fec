//! Finite-field Diffie-Hellman
//!
//! Group parameter generation over safe primes, key pair derivation, public
//! value validation and shared secret computation.

use num_bigint_dig::{prime::probably_prime, BigUint, RandBigInt};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Smallest prime size accepted for parameter generation
pub const MIN_BITS: usize = 64;

const PRIMALITY_ROUNDS: usize = 20;

/// Candidates scanned from one random starting point before drawing another
const SEARCH_WINDOW: usize = 1 << 14;

/// Odd primes used to discard safe-prime candidates before primality tests
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// DH domain parameters `(p, g)`
#[derive(Clone, PartialEq, Eq)]
pub struct DhGroup {
    p: BigUint,
    g: BigUint,
}

impl DhGroup {
    /// Wrap existing parameters; `p` must be odd and `1 < g < p - 1`
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        if p < BigUint::from(3u32) || &p % 2u32 == BigUint::from(0u32) {
            return Err(Error::DhError("modulus must be an odd prime".to_string()));
        }
        let upper = &p - 1u32;
        if g <= BigUint::from(1u32) || g >= upper {
            return Err(Error::DhError("generator out of range".to_string()));
        }
        Ok(Self { p, g })
    }

    /// Generate a safe-prime group of `bits` bits for `generator`
    ///
    /// # Arguments
    /// * `bits` - Prime size, at least [`MIN_BITS`]
    /// * `generator` - 2 or larger; 2, 3 and 5 constrain `p` so that the
    ///   generator is suitable
    pub fn generate(bits: usize, generator: u32) -> Result<Self> {
        if bits < MIN_BITS {
            return Err(Error::DhError(format!(
                "modulus too small: {} bits (minimum {})",
                bits, MIN_BITS
            )));
        }
        if generator < 2 {
            return Err(Error::DhError(format!("bad generator: {}", generator)));
        }
        // p = 2q + 1 must satisfy p mod modulus == residue
        let (modulus, residue): (u32, u32) = match generator {
            2 => (24, 23),
            5 => (60, 59),
            _ => (12, 11),
        };
        let step = modulus / 2;
        let q_residue = (residue - 1) / 2;
        let top = BigUint::from(1u32) << (bits - 2);

        let mut rng = rand::thread_rng();
        let mut attempts = 0u32;
        let p = 'search: loop {
            let start = rng.gen_biguint(bits - 1) | top.clone();
            let offset = &start % step;
            let mut q = start - offset + q_residue;
            for _ in 0..SEARCH_WINDOW {
                if q.bits() != bits - 1 {
                    continue 'search;
                }
                let p = (q.clone() << 1usize) + 1u32;
                if passes_sieve(&q) && passes_sieve(&p) {
                    attempts += 1;
                    if probably_prime(&q, PRIMALITY_ROUNDS) && probably_prime(&p, PRIMALITY_ROUNDS) {
                        break 'search p;
                    }
                }
                q = q + step;
            }
        };
        debug!(bits, generator, attempts, "generated DH safe prime");
        Self::new(p, BigUint::from(generator))
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Size of the prime in bits
    pub fn bits(&self) -> usize {
        self.p.bits()
    }

    /// Random private exponent in `[2, p - 2]`
    pub fn generate_private_key(&self) -> Zeroizing<BigUint> {
        let mut rng = rand::thread_rng();
        let low = BigUint::from(2u32);
        let high = &self.p - 1u32;
        Zeroizing::new(rng.gen_biguint_range(&low, &high))
    }

    /// `g^x mod p`
    pub fn public_key(&self, private: &BigUint) -> BigUint {
        self.g.modpow(private, &self.p)
    }

    /// Reject public values outside `(1, p - 1)`
    pub fn check_public_key(&self, y: &BigUint) -> Result<()> {
        let upper = &self.p - 1u32;
        if y <= &BigUint::from(1u32) || y >= &upper {
            return Err(Error::DhError("public value out of range".to_string()));
        }
        Ok(())
    }

    /// Shared secret `peer^x mod p`, big-endian without leading zeros
    pub fn compute_key(&self, private: &BigUint, peer: &BigUint) -> Result<Zeroizing<Vec<u8>>> {
        self.check_public_key(peer)?;
        let shared = Zeroizing::new(peer.modpow(private, &self.p));
        if *shared <= BigUint::from(1u32) {
            return Err(Error::DhError("degenerate shared secret".to_string()));
        }
        Ok(Zeroizing::new(shared.to_bytes_be()))
    }
}

fn passes_sieve(n: &BigUint) -> bool {
    let zero = BigUint::from(0u32);
    SMALL_PRIMES.iter().all(|&r| n % r != zero)
}

impl std::fmt::Debug for DhGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhGroup")
            .field("bits", &self.bits())
            .field("g", &self.g.to_str_radix(10))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 2409 Oakley group 1 (768-bit MODP)
    const OAKLEY_768: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";

    fn oakley() -> DhGroup {
        let p = BigUint::parse_bytes(OAKLEY_768.as_bytes(), 16).unwrap();
        DhGroup::new(p, BigUint::from(2u32)).unwrap()
    }

    #[test]
    fn test_agreement_is_symmetric() {
        let group = oakley();
        let a = group.generate_private_key();
        let b = group.generate_private_key();
        let ya = group.public_key(&a);
        let yb = group.public_key(&b);
        let s1 = group.compute_key(&a, &yb).unwrap();
        let s2 = group.compute_key(&b, &ya).unwrap();
        assert_eq!(*s1, *s2);
        assert!(s1.len() <= 96);
    }

    #[test]
    fn test_generate_small_group() {
        let group = DhGroup::generate(128, 2).unwrap();
        assert_eq!(group.bits(), 128);
        assert_eq!(group.p() % 24u32, BigUint::from(23u32));
        let q: BigUint = (group.p() - 1u32) >> 1usize;
        assert!(probably_prime(&q, 20));
    }

    #[test]
    fn test_generator_residues() {
        for (generator, modulus, residue) in [(3u32, 12u32, 11u32), (5, 60, 59), (7, 12, 11)] {
            let group = DhGroup::generate(96, generator).unwrap();
            assert_eq!(group.bits(), 96);
            assert_eq!(group.g(), &BigUint::from(generator));
            assert_eq!(group.p() % modulus, BigUint::from(residue));
            assert!(probably_prime(group.p(), 20));
        }
    }

    #[test]
    fn test_sieve() {
        assert!(!passes_sieve(&BigUint::from(3u32 * 1_000_003)));
        assert!(passes_sieve(&BigUint::from(1_000_003u32)));
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        assert!(DhGroup::generate(32, 2).is_err());
        assert!(DhGroup::generate(128, 1).is_err());
    }

    #[test]
    fn test_public_value_validation() {
        let group = oakley();
        let x = group.generate_private_key();
        let p_minus_1 = group.p() - 1u32;
        assert!(group.compute_key(&x, &BigUint::from(1u32)).is_err());
        assert!(group.compute_key(&x, &p_minus_1).is_err());
        assert!(group.compute_key(&x, group.p()).is_err());
        assert!(group.compute_key(&x, &BigUint::from(2u32)).is_ok());
    }

    #[test]
    fn test_new_validates() {
        assert!(DhGroup::new(BigUint::from(24u32), BigUint::from(2u32)).is_err());
        assert!(DhGroup::new(BigUint::from(23u32), BigUint::from(1u32)).is_err());
        assert!(DhGroup::new(BigUint::from(23u32), BigUint::from(5u32)).is_ok());
    }
}

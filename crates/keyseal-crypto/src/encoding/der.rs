//! ASN.1 structures not covered by the primitive crates
//!
//! PKCS#3 DH parameters and the OpenSSL "traditional" DSA private key, plus
//! the algorithm OIDs used to dispatch PKCS#8 and SPKI documents.

use der::{
    asn1::{AnyRef, Uint},
    Decode, Encode, Sequence,
};
use num_bigint_dig::BigUint;
use pkcs8::ObjectIdentifier;

use crate::error::{Error, Result};

pub const RSA_ENCRYPTION: ObjectIdentifier = const_oid::db::rfc5912::RSA_ENCRYPTION;
pub const ID_DSA: ObjectIdentifier = const_oid::db::rfc5912::ID_DSA;
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = const_oid::db::rfc5912::ID_EC_PUBLIC_KEY;
/// PKCS#3 `dhKeyAgreement`
pub const DH_KEY_AGREEMENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.3.1");

/// ```text
/// DHParameter ::= SEQUENCE {
///   prime INTEGER, base INTEGER, privateValueLength INTEGER OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct DhParameter {
    pub prime: Uint,
    pub base: Uint,
    #[asn1(optional = "true")]
    pub private_value_length: Option<u32>,
}

impl DhParameter {
    pub fn new(p: &BigUint, g: &BigUint) -> Result<Self> {
        Ok(Self {
            prime: to_uint(p)?,
            base: to_uint(g)?,
            private_value_length: None,
        })
    }

    /// Decode from the `parameters` field of an algorithm identifier
    pub fn from_any(any: AnyRef<'_>) -> Result<Self> {
        Ok(any.decode_as::<DhParameter>()?)
    }

    pub fn p(&self) -> BigUint {
        from_uint(&self.prime)
    }

    pub fn g(&self) -> BigUint {
        from_uint(&self.base)
    }
}

/// ```text
/// DSAPrivateKey ::= SEQUENCE {
///   version INTEGER, p INTEGER, q INTEGER, g INTEGER,
///   pub_key INTEGER, priv_key INTEGER }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct DsaPrivateKeyDocument {
    pub version: u8,
    pub p: Uint,
    pub q: Uint,
    pub g: Uint,
    pub public_key: Uint,
    pub private_key: Uint,
}

impl DsaPrivateKeyDocument {
    pub fn new(p: &BigUint, q: &BigUint, g: &BigUint, y: &BigUint, x: &BigUint) -> Result<Self> {
        Ok(Self {
            version: 0,
            p: to_uint(p)?,
            q: to_uint(q)?,
            g: to_uint(g)?,
            public_key: to_uint(y)?,
            private_key: to_uint(x)?,
        })
    }
}

/// Convert a big integer into an ASN.1 unsigned INTEGER
pub fn to_uint(value: &BigUint) -> Result<Uint> {
    Ok(Uint::new(&value.to_bytes_be())?)
}

pub fn from_uint(value: &Uint) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}

/// DER encoding of a lone INTEGER, the payload DH keys carry in PKCS#8 and SPKI
pub fn encode_integer(value: &BigUint) -> Result<Vec<u8>> {
    Ok(to_uint(value)?.to_der()?)
}

pub fn decode_integer(der: &[u8]) -> Result<BigUint> {
    let value = Uint::from_der(der)?;
    Ok(from_uint(&value))
}

pub fn unsupported_oid(oid: &ObjectIdentifier) -> Error {
    Error::Other(format!("Unsupported algorithm OID: {}", oid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dh_parameter_der() {
        let p = BigUint::from(0xffff_fffbu32);
        let g = BigUint::from(2u32);
        let params = DhParameter::new(&p, &g).unwrap();
        let der = params.to_der().unwrap();
        let decoded = DhParameter::from_der(&der).unwrap();
        assert_eq!(decoded.p(), p);
        assert_eq!(decoded.g(), g);
        assert!(decoded.private_value_length.is_none());
    }

    #[test]
    fn test_integer_payload() {
        let value = BigUint::from(0x80u32);
        let der = encode_integer(&value).unwrap();
        // high bit set forces a leading zero octet
        assert_eq!(der, vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(decode_integer(&der).unwrap(), value);
    }

    #[test]
    fn test_oids() {
        assert_eq!(RSA_ENCRYPTION.to_string(), "1.2.840.113549.1.1.1");
        assert_eq!(ID_DSA.to_string(), "1.2.840.10040.4.1");
        assert_eq!(ID_EC_PUBLIC_KEY.to_string(), "1.2.840.10045.2.1");
    }
}

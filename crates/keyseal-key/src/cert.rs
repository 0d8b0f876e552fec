//! Certificates as a public key source
//!
//! Only the subject public key is consumed here; chain building and trust
//! evaluation live elsewhere.

use der::{Decode, DecodePem, Encode};

use crate::error::{Error, Result};

/// Anything that can hand out a subject public key as SPKI DER
pub trait PublicKeySource {
    fn subject_public_key(&self) -> Result<Vec<u8>>;
}

/// X.509 certificate wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    inner: x509_cert::Certificate,
}

impl From<x509_cert::Certificate> for Certificate {
    fn from(inner: x509_cert::Certificate) -> Self {
        Self { inner }
    }
}

impl Certificate {
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        let inner = x509_cert::Certificate::from_pem(pem)
            .map_err(|e| Error::CertificateError(format!("PEM decode failed: {}", e)))?;
        Ok(inner.into())
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = x509_cert::Certificate::from_der(der)
            .map_err(|e| Error::CertificateError(format!("DER decode failed: {}", e)))?;
        Ok(inner.into())
    }

    /// Independent copy of this certificate
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Subject distinguished name in RFC 4514 form
    pub fn subject(&self) -> String {
        self.inner.tbs_certificate.subject.to_string()
    }

    pub fn inner(&self) -> &x509_cert::Certificate {
        &self.inner
    }
}

impl PublicKeySource for Certificate {
    fn subject_public_key(&self) -> Result<Vec<u8>> {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::CertificateError(format!("SPKI encoding failed: {}", e)))
    }
}

/// Ordered certificate list; every entry is a duplicate of its source
#[derive(Debug, Clone, Default)]
pub struct CertificateStack {
    certificates: Vec<Certificate>,
}

impl CertificateStack {
    pub fn from_certificates(certificates: &[Certificate]) -> Self {
        Self {
            certificates: certificates.iter().map(Certificate::duplicate).collect(),
        }
    }

    pub fn push(&mut self, certificate: &Certificate) {
        self.certificates.push(certificate.duplicate());
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Certificate> {
        self.certificates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Self-signed P-256 certificate with its PKCS#8 private key DER
    pub(crate) fn self_signed() -> (Certificate, Vec<u8>) {
        let certified = rcgen::generate_simple_self_signed(vec!["keyseal.test".to_string()]).unwrap();
        let cert = Certificate::from_pem(certified.cert.pem()).unwrap();
        (cert, certified.key_pair.serialize_der())
    }

    #[test]
    fn test_subject_public_key() {
        let (cert, _) = self_signed();
        let spki = cert.subject_public_key().unwrap();
        assert_eq!(spki[0], 0x30);
        let der = cert.inner().to_der().unwrap();
        assert_eq!(Certificate::from_der(&der).unwrap(), cert);
    }

    #[test]
    fn test_stack_duplicates() {
        let (first, _) = self_signed();
        let (second, _) = self_signed();
        let stack = CertificateStack::from_certificates(&[first.clone(), second.clone()]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(0), Some(&first));
        assert_eq!(stack.get(1), Some(&second));
        drop(first);
        assert!(stack.get(0).unwrap().subject().contains("rcgen"));
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            Certificate::from_pem("not a certificate"),
            Err(Error::CertificateError(_))
        ));
    }
}

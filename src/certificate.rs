//! # Certificate Accessors
//!
//! The verifier only needs a handful of facts about a certificate: who it was
//! issued to and by, its validity window, its serial number and its canonical
//! encoded bytes. This module defines that narrow view as the [`Certificate`]
//! trait and provides two implementations:
//! - [`X509Cert`], parsed from DER or PEM with `x509-certificate`
//! - [`CertificateDetails`], an owned snapshot of any other implementation

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use x509_certificate::X509Certificate;

use crate::common::{TrustError, TrustResult};

const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Read-only view of a certificate as used by the trust decision.
pub trait Certificate {
    /// Subject distinguished name, most specific attribute first (`CN=..., O=...`).
    fn subject_dn(&self) -> String;
    /// Issuer distinguished name, same form as [`Certificate::subject_dn`].
    fn issuer_dn(&self) -> String;
    fn not_before(&self) -> DateTime<Utc>;
    fn not_after(&self) -> DateTime<Utc>;
    /// Serial number as big-endian two's complement bytes.
    fn serial_number(&self) -> Vec<u8>;
    /// Canonical encoded (DER) bytes the fingerprint is computed over.
    fn encoded(&self) -> TrustResult<Vec<u8>>;
}

/// An X.509 certificate obtained from a peer's chain.
///
/// The original DER bytes are kept verbatim so the fingerprint matches what
/// other tools (e.g. `openssl x509 -fingerprint`) report for the same file.
#[derive(Debug, Clone)]
pub struct X509Cert {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    serial: Vec<u8>,
}

impl X509Cert {
    /// Parses a PEM document holding a single `CERTIFICATE` block.
    pub fn from_pem(data: &[u8]) -> TrustResult<Self> {
        let document = pem::parse(data)?;
        if document.tag() != "CERTIFICATE" {
            return Err(TrustError::Certificate(format!(
                "unexpected PEM block {}",
                document.tag()
            )));
        }
        Self::try_from(document.contents())
    }

    /// Loads a certificate file, accepting either PEM or raw DER content.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TrustResult<Self> {
        let bytes = fs::read(path)?;
        if bytes.starts_with(PEM_MARKER) {
            Self::from_pem(&bytes)
        } else {
            Self::try_from(bytes.as_slice())
        }
    }

    fn distinguished_name(name: &x509_certificate::rfc3280::Name) -> TrustResult<String> {
        name.user_friendly_str()
            .map_err(|e| TrustError::Certificate(e.to_string()))
    }
}

impl<'a> TryFrom<&'a [u8]> for X509Cert {
    type Error = TrustError;

    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        let certificate = X509Certificate::from_der(bytes)?;
        Ok(Self {
            der: bytes.to_vec(),
            subject: Self::distinguished_name(certificate.subject_name())?,
            issuer: Self::distinguished_name(certificate.issuer_name())?,
            not_before: certificate.validity_not_before(),
            not_after: certificate.validity_not_after(),
            serial: certificate.serial_number_asn1().as_slice().to_vec(),
        })
    }
}

impl Certificate for X509Cert {
    fn subject_dn(&self) -> String {
        self.subject.clone()
    }

    fn issuer_dn(&self) -> String {
        self.issuer.clone()
    }

    fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    fn serial_number(&self) -> Vec<u8> {
        self.serial.clone()
    }

    fn encoded(&self) -> TrustResult<Vec<u8>> {
        Ok(self.der.clone())
    }
}

/// Owned copy of everything the verifier reads from a certificate.
///
/// Used to move a borrowed certificate onto a worker thread, and handy for
/// building certificates by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateDetails {
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub serial: Vec<u8>,
    pub der: Vec<u8>,
}

impl CertificateDetails {
    /// Captures a snapshot of `certificate`.
    ///
    /// # Errors
    ///
    /// Fails with whatever error the certificate reports for its encoding.
    pub fn from_certificate(certificate: &dyn Certificate) -> TrustResult<Self> {
        Ok(Self {
            subject: certificate.subject_dn(),
            issuer: certificate.issuer_dn(),
            not_before: certificate.not_before(),
            not_after: certificate.not_after(),
            serial: certificate.serial_number(),
            der: certificate.encoded()?,
        })
    }
}

impl Certificate for CertificateDetails {
    fn subject_dn(&self) -> String {
        self.subject.clone()
    }

    fn issuer_dn(&self) -> String {
        self.issuer.clone()
    }

    fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    fn serial_number(&self) -> Vec<u8> {
        self.serial.clone()
    }

    fn encoded(&self) -> TrustResult<Vec<u8>> {
        Ok(self.der.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CertificateDetails {
        CertificateDetails {
            subject: "CN=leaf.example, O=Example".into(),
            issuer: "CN=Example CA".into(),
            not_before: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            not_after: DateTime::from_timestamp(1_800_000_000, 0).unwrap(),
            serial: vec![0x01, 0x02],
            der: vec![0x30, 0x03, 0x02, 0x01, 0x01],
        }
    }

    #[test]
    fn test_snapshot_copies_every_accessor() {
        let original = details();
        let snapshot = CertificateDetails::from_certificate(&original).unwrap();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_garbage_is_not_a_certificate() {
        let result = X509Cert::try_from(&[0x00u8, 0x01, 0x02][..]);
        assert!(matches!(result, Err(TrustError::Certificate(_))));
    }

    #[test]
    fn test_pem_with_wrong_tag_is_rejected() {
        let document = pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]);
        let encoded = pem::encode(&document);
        let result = X509Cert::from_pem(encoded.as_bytes());
        assert!(matches!(result, Err(TrustError::Certificate(_))));
    }
}

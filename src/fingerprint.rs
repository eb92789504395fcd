//! # Certificate Fingerprints
//!
//! A fingerprint is the SHA-1 digest of a certificate's canonical encoded
//! bytes, rendered with [`format_hash`]. It is deterministic: the same bytes
//! always produce the same string, so a fingerprint persisted by one process
//! is recognized by the next.

use sha1::{Digest, Sha1};

use crate::certificate::Certificate;
use crate::common::{TrustError, TrustResult};
use crate::hash_format::{format_hash, format_serial_digits, serial_to_hex};

/// Digest of raw encoded bytes, formatted as uppercase colon-separated hex.
pub fn fingerprint_bytes(encoded: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(encoded);
    format_hash(&hasher.finalize()[..])
}

/// Computes the fingerprint of a certificate.
///
/// # Errors
///
/// Returns `TrustError::FingerprintFailed` carrying the cause when the
/// certificate cannot produce its encoded form.
pub fn fingerprint(certificate: &dyn Certificate) -> TrustResult<String> {
    let encoded = certificate
        .encoded()
        .map_err(|e| TrustError::FingerprintFailed(e.to_string()))?;
    Ok(fingerprint_bytes(&encoded))
}

/// Formats the certificate serial number as space-grouped uppercase hex.
pub fn format_serial(certificate: &dyn Certificate) -> String {
    format_serial_digits(&serial_to_hex(&certificate.serial_number()))
}

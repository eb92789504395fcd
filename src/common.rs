//! # Common Types and Constants
//!
//! This module provides the types shared by every part of the trust verifier:
//! - The crate-wide error type and result alias
//! - Well-known settings keys
//! - The fixed strings shown by the console prompt

/// Settings key holding the fingerprint of the last accepted server certificate.
pub const ACCEPTED_CERTIFICATE_KEY: &str = "certtrust.server.certificate.hash";
/// Settings key of the headless/server mode flag.
pub const SERVER_MODE_KEY: &str = "certtrust.server";

pub const UI_SERVER_CERTIFICATE: &str = "Server Certificate";
pub const UI_ISSUED_TO: &str = "Issued to";
pub const UI_ISSUED_BY: &str = "Issued by";
pub const UI_VALID_FROM: &str = "Valid from";
pub const UI_VALID_UNTIL: &str = "Valid until";
pub const UI_SERIAL: &str = "Serial";
pub const UI_FINGERPRINT: &str = "FingerPrint";
pub const UI_UNTRUSTED_CERTIFICATE: &str = "Server provided an untrusted certificate,\n \
you can choose to accept or deny access.\nAccept certificate (y/n)?";
pub const UI_ANSWER_YES: &str = "y";
pub const UI_ANSWER_NO: &str = "n";

pub type TrustResult<R> = Result<R, TrustError>;

/// Represents errors that can occur while deciding whether a certificate is trusted
///
/// Every variant ends up as a "not trusted" outcome for the TLS layer. The
/// distinctions only matter for diagnostics.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TrustError {
    #[error("Certificate chain validation failed: {0}")]
    ChainValidationFailed(String),
    #[error("Unable to compute certificate fingerprint: {0}")]
    FingerprintFailed(String),
    #[error("User rejected certificate")]
    UserRejected,
    #[error("Unable to read prompt answer: {0}")]
    PromptIOError(String),
    #[error("Invalid certificate: {0}")]
    Certificate(String),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("IO error: {0}")]
    IO(String),
}

impl TrustError {
    /// Whether the failure comes from the standard validator rather than the override path.
    pub fn is_chain_validation(&self) -> bool {
        matches!(self, TrustError::ChainValidationFailed(_))
    }
}

impl From<std::io::Error> for TrustError {
    fn from(e: std::io::Error) -> Self {
        TrustError::IO(e.to_string())
    }
}

impl From<rusqlite::Error> for TrustError {
    fn from(e: rusqlite::Error) -> Self {
        TrustError::Settings(format!("{:?}", e))
    }
}

impl From<x509_certificate::X509CertificateError> for TrustError {
    fn from(e: x509_certificate::X509CertificateError) -> Self {
        TrustError::Certificate(e.to_string())
    }
}

impl From<pem::PemError> for TrustError {
    fn from(e: pem::PemError) -> Self {
        TrustError::Certificate(e.to_string())
    }
}

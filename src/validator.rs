use std::marker::PhantomData;

use crate::certificate::Certificate;
use crate::common::{TrustError, TrustResult};

/// Standard certificate chain validation against trust anchors.
///
/// Chain building and signature checks happen behind this trait; the
/// verifier only sees success or `TrustError::ChainValidationFailed`.
pub trait ChainValidator: Send + Sync {
    type Cert: Certificate;

    /// Validates a server chain, leaf first.
    fn check_server_trusted(&self, chain: &[Self::Cert], auth_type: &str) -> TrustResult<()>;

    /// Validates a client chain, leaf first.
    fn check_client_trusted(&self, chain: &[Self::Cert], auth_type: &str) -> TrustResult<()>;

    /// Trust anchors the validator accepts as issuers.
    fn accepted_issuers(&self) -> Vec<Self::Cert>;
}

/// A validator with no trust anchors: no chain ever validates.
#[derive(Debug)]
pub struct EmptyTrustStore<C> {
    certificate_type: PhantomData<fn() -> C>,
}

impl<C> EmptyTrustStore<C> {
    pub fn new() -> Self {
        Self {
            certificate_type: PhantomData,
        }
    }

    fn reject(chain_len: usize) -> TrustResult<()> {
        Err(TrustError::ChainValidationFailed(format!(
            "no trust anchor for chain of {} certificate(s)",
            chain_len
        )))
    }
}

impl<C> Default for EmptyTrustStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Certificate> ChainValidator for EmptyTrustStore<C> {
    type Cert = C;

    fn check_server_trusted(&self, chain: &[C], _auth_type: &str) -> TrustResult<()> {
        Self::reject(chain.len())
    }

    fn check_client_trusted(&self, chain: &[C], _auth_type: &str) -> TrustResult<()> {
        Self::reject(chain.len())
    }

    fn accepted_issuers(&self) -> Vec<C> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::CertificateDetails;

    #[test]
    fn test_empty_trust_store_rejects_everything() {
        let store = EmptyTrustStore::<CertificateDetails>::new();
        assert!(store.check_server_trusted(&[], "RSA").unwrap_err().is_chain_validation());
        assert!(store.check_client_trusted(&[], "RSA").unwrap_err().is_chain_validation());
        assert!(store.accepted_issuers().is_empty());
    }
}

//! # Trust Verifier
//!
//! [`TrustVerifier`] decorates a standard [`ChainValidator`] with a
//! user-assisted override for server certificates:
//!
//! 1. The standard validator always runs first and is final on success.
//! 2. On failure with a non-empty chain, the leaf certificate is
//!    fingerprinted and compared with the last accepted fingerprint.
//! 3. A match is trusted silently; otherwise the prompt decides, and an
//!    acceptance replaces the stored fingerprint.
//!
//! Client chains never get the override path.
//!
//! ## Concurrency
//!
//! The read, compare and write of the stored fingerprint are not atomic by
//! default: two threads accepting different certificates at the same time
//! race, and the last write wins. [`TrustVerifier::with_serialized_decisions`]
//! holds a lock across fingerprinting, lookup, prompt and update, so a
//! certificate accepted by one thread is recognized by the next instead of
//! being asked about again.
//!
//! Keeping questions from interleaving on a shared terminal is the prompt's
//! job: [`ConsolePrompt`](crate::prompt::ConsolePrompt) asks one question at a
//! time whether or not decisions are serialized here.

use std::sync::{Arc, Mutex};

use crate::certificate::Certificate;
use crate::common::{TrustError, TrustResult};
use crate::decision_cache::DecisionCache;
use crate::fingerprint::fingerprint;
use crate::prompt::InteractivePrompt;
use crate::settings::SettingsStore;
use crate::validator::ChainValidator;

/// Outcome of the user-assisted path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    Trusted,
    Rejected,
}

pub struct TrustVerifier<V: ChainValidator> {
    validator: V,
    cache: DecisionCache,
    prompt: Arc<dyn InteractivePrompt>,
    decision_lock: Option<Mutex<()>>,
}

impl<V: ChainValidator> TrustVerifier<V> {
    pub fn new(
        validator: V,
        settings: Arc<dyn SettingsStore>,
        prompt: Arc<dyn InteractivePrompt>,
    ) -> Self {
        Self {
            validator,
            cache: DecisionCache::new(settings),
            prompt,
            decision_lock: None,
        }
    }

    /// Serializes the fingerprint lookup, prompt and update across threads.
    pub fn with_serialized_decisions(mut self) -> Self {
        self.decision_lock = Some(Mutex::new(()));
        self
    }

    pub fn decision_cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// Validates a server chain, falling back to a user decision on the leaf.
    ///
    /// # Errors
    ///
    /// - `TrustError::ChainValidationFailed` when validation fails on an empty chain
    /// - `TrustError::FingerprintFailed` when the leaf cannot be fingerprinted
    /// - `TrustError::UserRejected` when the prompt declines
    /// - `TrustError::Settings` when the stored fingerprint cannot be read or written
    pub fn check_server_trusted(&self, chain: &[V::Cert], auth_type: &str) -> TrustResult<()> {
        let error = match self.validator.check_server_trusted(chain, auth_type) {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };
        let Some(leaf) = chain.first() else {
            return Err(error);
        };
        log::warn!("Standard validation failed: {}", error);
        match self.user_check_server_trusted(leaf)? {
            TrustDecision::Trusted => Ok(()),
            TrustDecision::Rejected => Err(TrustError::UserRejected),
        }
    }

    /// Client chains go straight to the standard validator.
    pub fn check_client_trusted(&self, chain: &[V::Cert], auth_type: &str) -> TrustResult<()> {
        self.validator.check_client_trusted(chain, auth_type)
    }

    pub fn accepted_issuers(&self) -> Vec<V::Cert> {
        self.validator.accepted_issuers()
    }

    /// Decides on a certificate that failed standard validation.
    ///
    /// A fingerprint equal to the stored acceptance is trusted without
    /// prompting. Otherwise the prompt is asked and, on acceptance, the new
    /// fingerprint replaces the stored one. Rejections are never stored.
    pub fn user_check_server_trusted(
        &self,
        certificate: &dyn Certificate,
    ) -> TrustResult<TrustDecision> {
        let _guard = match &self.decision_lock {
            Some(lock) => Some(
                lock.lock()
                    .map_err(|e| TrustError::Settings(format!("{:?}", e)))?,
            ),
            None => None,
        };
        let certificate_hash = fingerprint(certificate)?;
        if let Some(accepted) = self.cache.recognize(&certificate_hash)? {
            log::debug!("Found previously accepted certificate {}", accepted);
            return Ok(TrustDecision::Trusted);
        }
        if !self.prompt.ask(certificate) {
            log::warn!("User rejected certificate {}", certificate_hash);
            return Ok(TrustDecision::Rejected);
        }
        self.cache.set(&certificate_hash)?;
        log::info!("Accepted certificate {}", certificate_hash);
        Ok(TrustDecision::Trusted)
    }
}

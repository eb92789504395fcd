use std::sync::Arc;

use crate::common::{TrustResult, ACCEPTED_CERTIFICATE_KEY};
use crate::settings::SettingsStore;

/// Remembers the fingerprint of the last certificate a user accepted.
///
/// Only one fingerprint is kept. Accepting another certificate overwrites
/// it, and nothing here ever deletes it.
#[derive(Clone)]
pub struct DecisionCache {
    settings: Arc<dyn SettingsStore>,
}

impl DecisionCache {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    pub fn get(&self) -> TrustResult<Option<String>> {
        self.settings.get_string(ACCEPTED_CERTIFICATE_KEY)
    }

    pub fn set(&self, fingerprint: &str) -> TrustResult<()> {
        self.settings.set_string(ACCEPTED_CERTIFICATE_KEY, fingerprint)
    }

    /// Returns the stored fingerprint when it is non-empty and equals
    /// `fingerprint` ignoring case.
    pub fn recognize(&self, fingerprint: &str) -> TrustResult<Option<String>> {
        Ok(self
            .get()?
            .filter(|accepted| !accepted.is_empty() && accepted.eq_ignore_ascii_case(fingerprint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    #[test]
    fn test_recognize_ignores_case() {
        let cache = DecisionCache::new(Arc::new(MemorySettings::new()));
        assert_eq!(None, cache.recognize("AB:CD").unwrap());
        cache.set("ab:cd").unwrap();
        assert_eq!(Some("ab:cd".to_string()), cache.recognize("AB:CD").unwrap());
        assert_eq!(None, cache.recognize("AB:CE").unwrap());
    }

    #[test]
    fn test_empty_record_never_matches() {
        let cache = DecisionCache::new(Arc::new(MemorySettings::new()));
        cache.set("").unwrap();
        assert_eq!(None, cache.recognize("").unwrap());
    }

    #[test]
    fn test_set_overwrites_previous_acceptance() {
        let settings = Arc::new(MemorySettings::new());
        let cache = DecisionCache::new(settings.clone());
        cache.set("AA").unwrap();
        cache.set("BB").unwrap();
        assert_eq!(
            Some("BB".to_string()),
            settings.get_string(ACCEPTED_CERTIFICATE_KEY).unwrap()
        );
    }
}

//! Shared state handed to every handler

use crate::core_store::WaitlistStore;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Per-process dependencies. Holds no waitlist data itself.
#[derive(Clone)]
pub struct AppState {
    /// Store owning the membership set and metadata
    pub store: Arc<dyn WaitlistStore>,

    /// Secret guarding the membership listing
    admin_key: Option<SecretString>,
}

impl AppState {
    pub fn new(store: Arc<dyn WaitlistStore>, admin_key: Option<SecretString>) -> Self {
        Self { store, admin_key }
    }

    /// Whether `presented` grants access to the membership listing.
    ///
    /// A missing credential, or no configured secret, never authorizes.
    pub fn is_admin(&self, presented: Option<&str>) -> bool {
        match (&self.admin_key, presented) {
            (Some(expected), Some(presented)) => {
                let expected = expected.expose_secret();
                !expected.is_empty() && presented == expected.as_str()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::MemoryStore;

    fn state(admin_key: Option<&str>) -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            admin_key.map(|k| SecretString::new(k.to_string())),
        )
    }

    #[test]
    fn test_matching_key_is_admin() {
        assert!(state(Some("s3cret")).is_admin(Some("s3cret")));
    }

    #[test]
    fn test_mismatch_is_not_admin() {
        let state = state(Some("s3cret"));
        assert!(!state.is_admin(Some("S3CRET")));
        assert!(!state.is_admin(Some("s3cret ")));
        assert!(!state.is_admin(None));
    }

    #[test]
    fn test_unconfigured_secret_rejects_everyone() {
        assert!(!state(None).is_admin(Some("")));
        assert!(!state(None).is_admin(None));
        assert!(!state(Some("")).is_admin(Some("")));
    }
}

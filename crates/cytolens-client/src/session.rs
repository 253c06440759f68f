//! Session collaborator: bearer credential and hospital scope.

use std::collections::HashMap;
use std::sync::RwLock;

/// Supplies the credential and tenant scope captured at login time.
///
/// Implementations are read at client construction only; a [`ScopedClient`]
/// resolves both values once and never re-reads them.
///
/// [`ScopedClient`]: crate::ScopedClient
pub trait SessionProvider: Send + Sync {
    /// Returns the bearer credential, if a user is logged in.
    fn bearer_credential(&self) -> Option<String>;

    /// Returns the hospital scope identifier for a non-global-admin session.
    fn hospital_scope(&self) -> Option<String>;
}

/// Storage key for the bearer credential.
const BEARER_KEY: &str = "bearer_credential";

/// Storage key for the hospital scope.
const SCOPE_KEY: &str = "hospital_scope";

/// In-memory key-value backed session store.
///
/// Values are set at login time and cleared at logout, mirroring the
/// persistent key-value storage the host application uses.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySession {
    /// Creates an empty, logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the credential and hospital scope for a logged-in user.
    pub fn login(&self, bearer_credential: impl Into<String>, hospital_scope: impl Into<String>) {
        let mut values = self.values.write().expect("session store lock poisoned");
        values.insert(BEARER_KEY.to_string(), bearer_credential.into());
        values.insert(SCOPE_KEY.to_string(), hospital_scope.into());
    }

    /// Clears all session state.
    pub fn logout(&self) {
        self.values
            .write()
            .expect("session store lock poisoned")
            .clear();
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("session store lock poisoned")
            .get(key)
            .cloned()
    }
}

impl SessionProvider for MemorySession {
    fn bearer_credential(&self) -> Option<String> {
        self.get(BEARER_KEY)
    }

    fn hospital_scope(&self) -> Option<String> {
        self.get(SCOPE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_out_session_is_empty() {
        let session = MemorySession::new();
        assert!(session.bearer_credential().is_none());
        assert!(session.hospital_scope().is_none());
    }

    #[test]
    fn test_login_then_logout() {
        let session = MemorySession::new();
        session.login("token-1", "mercy-general");
        assert_eq!(session.bearer_credential().as_deref(), Some("token-1"));
        assert_eq!(session.hospital_scope().as_deref(), Some("mercy-general"));

        session.logout();
        assert!(session.bearer_credential().is_none());
        assert!(session.hospital_scope().is_none());
    }
}

//! Request scope: tenant namespace plus credential.

use crate::session::SessionProvider;

/// Hospital scope and bearer credential for one client instance.
///
/// Both values are resolved once, at construction, and stay immutable for
/// the instance's lifetime. A caller needing a different scope constructs a
/// new client.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    hospital: Option<String>,
    bearer: Option<String>,
}

impl RequestScope {
    /// Creates a scope with an explicit hospital namespace and credential.
    pub fn new(
        hospital: impl Into<Option<String>>,
        bearer: impl Into<Option<String>>,
    ) -> Self {
        Self {
            hospital: hospital.into(),
            bearer: bearer.into(),
        }
    }

    /// Resolves the scope from the session collaborator.
    ///
    /// A missing credential is not an error: the client still constructs and
    /// anonymous endpoints keep working, while authenticated endpoints fail
    /// with the authorization error the server returns.
    pub fn from_session(session: &dyn SessionProvider) -> Self {
        Self {
            hospital: session.hospital_scope(),
            bearer: session.bearer_credential(),
        }
    }

    /// Creates an unauthenticated, unscoped instance.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the hospital scope, if any.
    pub fn hospital(&self) -> Option<&str> {
        self.hospital.as_deref()
    }

    /// Returns the bearer credential, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Returns whether a bearer credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.bearer.is_some()
    }
}

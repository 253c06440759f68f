//! Artifacts: uploaded images tied to one cell test.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::Result;
use crate::types::ImageRecord;

/// Identity of an artifact within one artifact store.
///
/// An artifact starts with a locally-generated key while its upload is in
/// flight and takes on the server-assigned identifier once the upload is
/// confirmed. A remote identifier is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactId {
    /// Locally-generated temporary key, only valid inside this client.
    Local(Uuid),
    /// Server-assigned identifier.
    Remote(String),
}

impl ArtifactId {
    /// Generates a fresh local key.
    pub fn local() -> Self {
        Self::Local(Uuid::new_v4())
    }

    /// Wraps a server-assigned identifier.
    pub fn remote(id: impl Into<String>) -> Self {
        Self::Remote(id.into())
    }

    /// Returns whether the server has assigned this identity.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns the server-assigned identifier, if any.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Self::Remote(id) => Some(id.as_str()),
            Self::Local(_) => None,
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(key) => write!(f, "local-{}", key),
            Self::Remote(id) => f.write_str(id),
        }
    }
}

/// Lifecycle state of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactState {
    /// Selected locally, upload not started.
    Pending,
    /// Part of a batch upload currently in flight.
    Uploading,
    /// Confirmed by the server; carries a remote identity and URL.
    Uploaded,
    /// Removal in flight against the remote store.
    Deleting,
    /// Terminal local failure.
    Failed,
}

impl ArtifactState {
    /// Returns whether the artifact is confirmed server-side.
    pub fn is_uploaded(&self) -> bool {
        matches!(self, ArtifactState::Uploaded)
    }

    /// Returns whether an upload or deletion is in flight for the artifact.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ArtifactState::Uploading | ArtifactState::Deleting)
    }

    /// Returns whether deletion may be requested for the artifact.
    ///
    /// Only `uploaded` artifacts can be deleted; delete controls stay
    /// disabled for every other state.
    pub fn can_delete(&self) -> bool {
        self.is_uploaded()
    }
}

/// One uploaded image belonging to a cell test.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Artifact identity; local until the server responds.
    pub id: ArtifactId,
    /// Absolute resource locator; absent until the upload is confirmed.
    pub url: Option<Url>,
    /// Current lifecycle state.
    pub state: ArtifactState,
}

impl Artifact {
    /// Creates a pending artifact for a freshly selected file.
    pub fn pending() -> Self {
        Self {
            id: ArtifactId::local(),
            url: None,
            state: ArtifactState::Pending,
        }
    }

    /// Creates an uploaded artifact from a server-assigned identity and URL.
    pub fn uploaded(id: impl Into<String>, url: Url) -> Self {
        Self {
            id: ArtifactId::remote(id),
            url: Some(url),
            state: ArtifactState::Uploaded,
        }
    }

    /// Builds an uploaded artifact from a wire record.
    ///
    /// The record's locator must already be absolute; providers rewrite
    /// server-relative paths before handing records to the store.
    pub fn from_record(record: ImageRecord) -> Result<Self> {
        let url = Url::parse(&record.image)?;
        Ok(Self::uploaded(record.id, url))
    }
}

//! Artifact store
//!
//! One store instance exists per `(patient_id, cell_test_id)` pair, owned by
//! the view displaying that cell test. All mutations are synchronous and
//! pushed explicitly by a coordinator after a confirmed server round-trip;
//! the store never refreshes itself.

use crate::TRACING_TARGET_STORE;
use crate::types::{Artifact, ArtifactId, ArtifactState};

/// Ordered collection of image artifacts for one cell test.
///
/// Insertion order is upload order and is preserved across deletions.
#[derive(Debug)]
pub struct ArtifactStore {
    patient_id: String,
    cell_test_id: String,
    artifacts: Vec<Artifact>,
}

impl ArtifactStore {
    /// Creates an empty store scoped to one cell test.
    pub fn new(patient_id: impl Into<String>, cell_test_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            cell_test_id: cell_test_id.into(),
            artifacts: Vec::new(),
        }
    }

    /// The patient this store is scoped to.
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// The cell test this store is scoped to.
    pub fn cell_test_id(&self) -> &str {
        &self.cell_test_id
    }

    /// Current ordered sequence of artifacts.
    pub fn list(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Number of artifacts currently held.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns whether the store holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Resets the store to the server's view after a full fetch.
    pub fn replace_all(&mut self, artifacts: Vec<Artifact>) {
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            cell_test_id = %self.cell_test_id,
            count = artifacts.len(),
            "Replacing store contents"
        );
        self.artifacts = artifacts;
    }

    /// Merges newly uploaded artifacts onto the end, in upload order.
    pub fn append_uploaded(&mut self, artifacts: Vec<Artifact>) {
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            cell_test_id = %self.cell_test_id,
            appended = artifacts.len(),
            "Appending uploaded artifacts"
        );
        self.artifacts.extend(artifacts);
    }

    /// Adds a single artifact at the end.
    pub fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Looks up an artifact by identifier.
    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| &a.id == id)
    }

    /// Position of an artifact in the current ordering.
    pub fn position(&self, id: &ArtifactId) -> Option<usize> {
        self.artifacts.iter().position(|a| &a.id == id)
    }

    /// Sets the lifecycle state of one artifact.
    ///
    /// Returns whether the artifact was present.
    pub fn set_state(&mut self, id: &ArtifactId, state: ArtifactState) -> bool {
        match self.artifacts.iter_mut().find(|a| &a.id == id) {
            Some(artifact) => {
                artifact.state = state;
                true
            }
            None => false,
        }
    }

    /// Removes one artifact by identifier.
    ///
    /// Idempotent: removing an absent identifier is a no-op and returns
    /// `None`. Relative order of the remaining artifacts is unchanged.
    pub fn remove(&mut self, id: &ArtifactId) -> Option<Artifact> {
        let index = self.position(id)?;
        let artifact = self.artifacts.remove(index);
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            cell_test_id = %self.cell_test_id,
            artifact_id = %artifact.id,
            "Removed artifact"
        );
        Some(artifact)
    }

    /// Re-inserts an artifact at a position, clamped to the current length.
    ///
    /// Used to restore an optimistically removed artifact after a failed
    /// deletion.
    pub fn insert(&mut self, index: usize, artifact: Artifact) {
        let index = index.min(self.artifacts.len());
        self.artifacts.insert(index, artifact);
    }
}

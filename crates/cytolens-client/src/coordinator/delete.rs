//! Deletion coordinator
//!
//! Removes one artifact optimistically, then reconciles with the server.
//! The removed artifact is staged in an undo buffer until the server
//! confirms; a failed delete restores it at its original position.

use crate::TRACING_TARGET_COORDINATOR;
use crate::api::ApiService;
use crate::error::{Error, Result};
use crate::store::ArtifactStore;
use crate::types::{ArtifactId, ArtifactState};

/// Outcome of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The artifact was removed locally and on the server.
    Deleted,
    /// The artifact was not in the store; nothing was done.
    NotPresent,
}

/// Coordinates artifact deletion for one cell test.
#[derive(Debug, Clone)]
pub struct DeletionCoordinator {
    api: ApiService,
}

impl DeletionCoordinator {
    /// Creates a deletion coordinator.
    pub fn new(api: ApiService) -> Self {
        Self { api }
    }

    /// Deletes one artifact, locally first and then on the server.
    ///
    /// Only `uploaded` artifacts can be deleted; anything still in flight is
    /// rejected. Deleting an identifier that is not in the store is an
    /// idempotent no-op. The artifact disappears from the store immediately;
    /// if the server rejects the delete it is restored where it was and the
    /// error is returned.
    pub async fn delete(
        &self,
        store: &mut ArtifactStore,
        id: &ArtifactId,
    ) -> Result<DeleteOutcome> {
        let Some(position) = store.position(id) else {
            tracing::debug!(
                target: TRACING_TARGET_COORDINATOR,
                artifact_id = %id,
                "Delete of absent artifact ignored"
            );
            return Ok(DeleteOutcome::NotPresent);
        };

        let state = store.list()[position].state;
        if !state.can_delete() {
            return Err(Error::state(
                "delete",
                format!(
                    "artifact {} is {}, only uploaded artifacts can be deleted",
                    id, state
                ),
            ));
        }
        let Some(remote_id) = id.as_remote().map(str::to_string) else {
            return Err(Error::state(
                "delete",
                format!("artifact {} has no server-assigned identity", id),
            ));
        };

        // Optimistic removal; the staged artifact is the undo buffer.
        let mut staged = match store.remove(id) {
            Some(artifact) => artifact,
            None => return Ok(DeleteOutcome::NotPresent),
        };
        staged.state = ArtifactState::Deleting;

        match self
            .api
            .delete_data_image(store.patient_id(), store.cell_test_id(), &remote_id)
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET_COORDINATOR,
                    artifact_id = %remote_id,
                    "Artifact deleted"
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                staged.state = ArtifactState::Uploaded;
                store.insert(position, staged);
                Err(err)
            }
        }
    }
}

//! Per-view ownership of the artifact lifecycle.

use crate::api::ApiService;
use crate::coordinator::{DeletionCoordinator, ProcessingCoordinator, UploadCoordinator};
use crate::error::Result;
use crate::results::ResultProjector;
use crate::store::ArtifactStore;
use crate::types::Artifact;

/// Everything one cell-test view owns: the artifact store, the coordinators
/// that mutate it, and the result projector.
///
/// One workspace exists per `(patient_id, cell_test_id)` pair; nothing in it
/// is shared process-wide. Dropping the workspace drops any in-flight
/// futures with it, so abandoned requests can never mutate a discarded
/// store.
#[derive(Debug)]
pub struct CellTestWorkspace {
    api: ApiService,
    /// Ordered artifact state for this cell test.
    pub store: ArtifactStore,
    /// Batch upload coordinator; owns the local selection buffer.
    pub uploader: UploadCoordinator,
    /// Optimistic deletion coordinator.
    pub deleter: DeletionCoordinator,
    /// Detection trigger coordinator.
    pub processor: ProcessingCoordinator,
    /// Read-through projection of server-computed results.
    pub results: ResultProjector,
}

impl CellTestWorkspace {
    /// Creates a workspace scoped to one cell test.
    pub fn new(
        api: ApiService,
        patient_id: impl Into<String>,
        cell_test_id: impl Into<String>,
    ) -> Self {
        let patient_id = patient_id.into();
        let cell_test_id = cell_test_id.into();
        Self {
            store: ArtifactStore::new(patient_id.clone(), cell_test_id.clone()),
            uploader: UploadCoordinator::new(api.clone()),
            deleter: DeletionCoordinator::new(api.clone()),
            processor: ProcessingCoordinator::new(api.clone(), cell_test_id),
            results: ResultProjector::new(api.clone()),
            api,
        }
    }

    /// The patient this workspace is scoped to.
    pub fn patient_id(&self) -> &str {
        self.store.patient_id()
    }

    /// The cell test this workspace is scoped to.
    pub fn cell_test_id(&self) -> &str {
        self.store.cell_test_id()
    }

    /// Resets the store to the server's current view of the cell test.
    ///
    /// Returns the number of artifacts fetched.
    pub async fn refresh_images(&mut self) -> Result<usize> {
        let records = self
            .api
            .list_data_images(self.store.patient_id(), self.store.cell_test_id())
            .await?;
        let artifacts = records
            .into_iter()
            .map(Artifact::from_record)
            .collect::<Result<Vec<_>>>()?;
        let count = artifacts.len();
        self.store.replace_all(artifacts);
        Ok(count)
    }

    /// Loads the result cache for this workspace's patient.
    pub async fn refresh_results(&mut self) -> Result<usize> {
        let patient_id = self.store.patient_id().to_string();
        self.results.load(&patient_id).await
    }
}

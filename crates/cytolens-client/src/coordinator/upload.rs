//! Upload coordinator
//!
//! Accepts a batch of local files, uploads them in one multipart request,
//! and merges the server-assigned identities into the artifact store.

use crate::TRACING_TARGET_COORDINATOR;
use crate::api::ApiService;
use crate::error::{Error, Result};
use crate::store::ArtifactStore;
use crate::types::{Artifact, ArtifactId, ArtifactState, ImageFile};

/// Outcome of a confirmed batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Server-assigned identities of the uploaded artifacts, in request order.
    pub artifact_ids: Vec<ArtifactId>,
}

impl UploadReceipt {
    /// Number of artifacts uploaded.
    pub fn count(&self) -> usize {
        self.artifact_ids.len()
    }
}

/// Coordinates batch uploads for one cell test.
///
/// The coordinator owns the local selection buffer. A failed upload keeps
/// the selection intact so the same batch can be re-submitted; it is cleared
/// only once the server confirms the batch.
#[derive(Debug)]
pub struct UploadCoordinator {
    api: ApiService,
    selection: Vec<ImageFile>,
    staged: Vec<ArtifactId>,
}

impl UploadCoordinator {
    /// Creates a coordinator with an empty selection.
    pub fn new(api: ApiService) -> Self {
        Self {
            api,
            selection: Vec::new(),
            staged: Vec::new(),
        }
    }

    /// The files currently selected for upload.
    pub fn selection(&self) -> &[ImageFile] {
        &self.selection
    }

    /// Returns whether any files are selected.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Adds files to the selection and stages a `pending` artifact for each.
    pub fn select_files(&mut self, store: &mut ArtifactStore, files: Vec<ImageFile>) {
        tracing::debug!(
            target: TRACING_TARGET_COORDINATOR,
            cell_test_id = store.cell_test_id(),
            selected = files.len(),
            "Files selected for upload"
        );
        for _ in &files {
            let artifact = Artifact::pending();
            self.staged.push(artifact.id.clone());
            store.push(artifact);
        }
        self.selection.extend(files);
    }

    /// Drops the selection and its staged artifacts without uploading.
    pub fn clear_selection(&mut self, store: &mut ArtifactStore) {
        self.discard_staged(store);
        self.selection.clear();
    }

    /// Uploads the selected batch in one multipart request.
    ///
    /// An empty selection is rejected locally; no network call is issued.
    /// On success the server's records are appended to the store in request
    /// order and the selection is cleared. On failure the whole batch is
    /// discarded from the store (no partial merge) and the selection stays
    /// for re-submission; the coordinator never retries by itself.
    pub async fn upload(&mut self, store: &mut ArtifactStore) -> Result<UploadReceipt> {
        if self.selection.is_empty() {
            return Err(Error::validation("files", "no files selected"));
        }

        // A failed attempt discards its staged artifacts; re-stage them
        // before the next try so the store reflects the batch in flight.
        if self.staged.is_empty() {
            for _ in &self.selection {
                let artifact = Artifact::pending();
                self.staged.push(artifact.id.clone());
                store.push(artifact);
            }
        }
        for id in &self.staged {
            store.set_state(id, ArtifactState::Uploading);
        }

        let outcome = self
            .api
            .upload_data_images(store.patient_id(), store.cell_test_id(), &self.selection)
            .await
            .and_then(|records| {
                records
                    .into_iter()
                    .map(Artifact::from_record)
                    .collect::<Result<Vec<_>>>()
            });

        match outcome {
            Ok(artifacts) => {
                self.discard_staged(store);
                let artifact_ids = artifacts.iter().map(|a| a.id.clone()).collect();
                store.append_uploaded(artifacts);
                self.selection.clear();
                Ok(UploadReceipt { artifact_ids })
            }
            Err(err) => {
                self.discard_staged(store);
                Err(err)
            }
        }
    }

    fn discard_staged(&mut self, store: &mut ArtifactStore) {
        for id in self.staged.drain(..) {
            store.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCellTestApi;
    use crate::types::ImageRecord;

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            image: format!("https://api.test/img/{}.png", id),
        }
    }

    fn files(count: usize) -> Vec<ImageFile> {
        (0..count)
            .map(|i| ImageFile::png(format!("slide-{}.png", i), vec![0u8; 4]))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_without_network_call() {
        let mock = MockCellTestApi::new();
        let mut store = ArtifactStore::new("p1", "ct1");
        let mut uploader = UploadCoordinator::new(mock.service());

        let err = uploader.upload(&mut store).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.calls().upload, 0);
    }

    #[tokio::test]
    async fn test_successful_batch_appends_in_request_order() {
        let mock = MockCellTestApi::new();
        mock.queue_upload_success(vec![record("a1"), record("a2")]);

        let mut store = ArtifactStore::new("p1", "ct1");
        let mut uploader = UploadCoordinator::new(mock.service());

        uploader.select_files(&mut store, files(2));
        assert_eq!(store.len(), 2);
        assert!(store.list().iter().all(|a| a.state == ArtifactState::Pending));

        let receipt = uploader.upload(&mut store).await.unwrap();
        assert_eq!(receipt.count(), 2);
        assert!(!uploader.has_selection());

        let artifacts = store.list();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].id, ArtifactId::remote("a1"));
        assert_eq!(artifacts[1].id, ArtifactId::remote("a2"));
        assert!(artifacts.iter().all(|a| a.state == ArtifactState::Uploaded));
        assert_eq!(
            artifacts[0].url.as_ref().unwrap().as_str(),
            "https://api.test/img/a1.png"
        );
        assert_eq!(
            artifacts[1].url.as_ref().unwrap().as_str(),
            "https://api.test/img/a2.png"
        );
    }

    #[tokio::test]
    async fn test_failed_batch_discarded_and_selection_kept() {
        let mock = MockCellTestApi::new();
        mock.queue_upload_failure(500, "storage unavailable");

        let mut store = ArtifactStore::new("p1", "ct1");
        let mut uploader = UploadCoordinator::new(mock.service());

        uploader.select_files(&mut store, files(2));
        let err = uploader.upload(&mut store).await.unwrap_err();
        assert!(!err.is_validation());

        // Whole batch discarded, nothing partially merged.
        assert!(store.is_empty());
        // Failed batch stays selected for re-submission.
        assert_eq!(uploader.selection().len(), 2);

        mock.queue_upload_success(vec![record("a1"), record("a2")]);
        let receipt = uploader.upload(&mut store).await.unwrap();
        assert_eq!(receipt.count(), 2);
        assert_eq!(store.len(), 2);
        assert!(!uploader.has_selection());
    }

    #[tokio::test]
    async fn test_clear_selection_drops_staged_artifacts() {
        let mock = MockCellTestApi::new();
        let mut store = ArtifactStore::new("p1", "ct1");
        let mut uploader = UploadCoordinator::new(mock.service());

        uploader.select_files(&mut store, files(3));
        assert_eq!(store.len(), 3);

        uploader.clear_selection(&mut store);
        assert!(store.is_empty());
        assert!(!uploader.has_selection());
        assert_eq!(mock.calls().upload, 0);
    }
}

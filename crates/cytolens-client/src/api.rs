//! Provider trait for the cell-test resource API.

use std::fmt;
use std::sync::Arc;

use crate::TRACING_TARGET_CLIENT;
use crate::error::Result;
use crate::types::{CellTest, ImageFile, ImageRecord, ProcessAck};

/// Core trait for the REST resource API of the cell-test service.
///
/// Implementations must return image locators already rewritten to absolute
/// form; consumers never see server-relative paths.
#[async_trait::async_trait]
pub trait CellTestApi: Send + Sync {
    /// Uploads a batch of images for a cell test in one multipart request.
    ///
    /// Returns one record per file, in request order.
    async fn upload_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        files: &[ImageFile],
    ) -> Result<Vec<ImageRecord>>;

    /// Lists the images currently attached to a cell test.
    async fn list_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
    ) -> Result<Vec<ImageRecord>>;

    /// Deletes one image from a cell test.
    async fn delete_data_image(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        image_id: &str,
    ) -> Result<()>;

    /// Triggers server-side detection for a cell test.
    async fn trigger_processing(&self, cell_test_id: &str) -> Result<ProcessAck>;

    /// Fetches all cell tests for a patient, including their results.
    async fn list_cell_tests(&self, patient_id: &str) -> Result<Vec<CellTest>>;
}

/// API service wrapper with observability.
///
/// This wrapper adds structured logging to any resource API implementation.
/// The inner provider is wrapped in `Arc` for cheap cloning; every
/// coordinator of one screen shares the same instance.
#[derive(Clone)]
pub struct ApiService {
    inner: Arc<dyn CellTestApi>,
}

impl fmt::Debug for ApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiService").finish_non_exhaustive()
    }
}

impl ApiService {
    /// Create a new API service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: CellTestApi + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Uploads a batch of images for a cell test.
    pub async fn upload_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        files: &[ImageFile],
    ) -> Result<Vec<ImageRecord>> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            patient_id,
            cell_test_id,
            batch_size = files.len(),
            "Uploading image batch"
        );

        let result = self
            .inner
            .upload_data_images(patient_id, cell_test_id, files)
            .await;

        match &result {
            Ok(records) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    cell_test_id,
                    uploaded = records.len(),
                    "Image batch uploaded"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    cell_test_id,
                    error = %error,
                    "Image batch upload failed"
                );
            }
        }

        result
    }

    /// Lists the images currently attached to a cell test.
    pub async fn list_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
    ) -> Result<Vec<ImageRecord>> {
        self.inner.list_data_images(patient_id, cell_test_id).await
    }

    /// Deletes one image from a cell test.
    pub async fn delete_data_image(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        image_id: &str,
    ) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            cell_test_id,
            image_id,
            "Deleting image"
        );

        let result = self
            .inner
            .delete_data_image(patient_id, cell_test_id, image_id)
            .await;

        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                cell_test_id,
                image_id,
                error = %error,
                "Image deletion failed"
            );
        }

        result
    }

    /// Triggers server-side detection for a cell test.
    pub async fn trigger_processing(&self, cell_test_id: &str) -> Result<ProcessAck> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            cell_test_id,
            "Triggering processing"
        );

        let result = self.inner.trigger_processing(cell_test_id).await;

        match &result {
            Ok(ack) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    cell_test_id,
                    run_id = %ack.id,
                    "Processing accepted"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    cell_test_id,
                    error = %error,
                    "Processing trigger failed"
                );
            }
        }

        result
    }

    /// Fetches all cell tests for a patient, including their results.
    pub async fn list_cell_tests(&self, patient_id: &str) -> Result<Vec<CellTest>> {
        self.inner.list_cell_tests(patient_id).await
    }
}

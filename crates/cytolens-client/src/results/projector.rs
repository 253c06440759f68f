//! Result projector
//!
//! Fetches the result records of one patient in a single call and exposes a
//! per-cell-test view over the cached snapshot. Results are
//! eventually-consistent snapshots, never live-updated; a change of patient
//! always re-fetches instead of patching the cache.

use crate::TRACING_TARGET_RESULTS;
use crate::api::ApiService;
use crate::error::{Error, Result};
use crate::types::TestResult;

/// Read-through cache of detection results, keyed by patient.
#[derive(Debug)]
pub struct ResultProjector {
    api: ApiService,
    patient_id: Option<String>,
    cache: Vec<TestResult>,
}

impl ResultProjector {
    /// Creates an empty projector.
    pub fn new(api: ApiService) -> Self {
        Self {
            api,
            patient_id: None,
            cache: Vec::new(),
        }
    }

    /// The patient the cache currently belongs to.
    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    /// Loads results for a patient, re-fetching from the server.
    ///
    /// Switching to a different patient drops the old cache entirely before
    /// the fetch. Returns the number of cached results.
    pub async fn load(&mut self, patient_id: &str) -> Result<usize> {
        if self.patient_id.as_deref() != Some(patient_id) {
            tracing::debug!(
                target: TRACING_TARGET_RESULTS,
                patient_id,
                "Switching result cache to new patient"
            );
            self.cache.clear();
            self.patient_id = Some(patient_id.to_string());
        }
        self.refresh().await
    }

    /// Re-fetches results for the current patient.
    pub async fn refresh(&mut self) -> Result<usize> {
        let Some(patient_id) = self.patient_id.clone() else {
            return Err(Error::validation("patient_id", "missing patient identifier"));
        };

        let tests = self.api.list_cell_tests(&patient_id).await?;
        self.cache = tests.into_iter().flat_map(|test| test.results).collect();

        tracing::debug!(
            target: TRACING_TARGET_RESULTS,
            patient_id = %patient_id,
            results = self.cache.len(),
            "Result cache refreshed"
        );
        Ok(self.cache.len())
    }

    /// All cached results for the current patient.
    pub fn results(&self) -> &[TestResult] {
        &self.cache
    }

    /// Cached results belonging to one cell test.
    pub fn results_for(&self, cell_test_id: &str) -> Vec<&TestResult> {
        self.cache
            .iter()
            .filter(|result| result.celltest_id == cell_test_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::mock::MockCellTestApi;
    use crate::types::{CellTest, CellTestStatus, ResultImage, TestResult};

    fn result(celltest_id: &str, description: &str) -> TestResult {
        TestResult {
            description: description.to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            celltest_id: celltest_id.to_string(),
            result_images: vec![ResultImage {
                id: format!("{}-img", celltest_id),
                image: format!("https://api.test/img/{}.png", celltest_id),
            }],
        }
    }

    fn cell_test(id: &str, results: Vec<TestResult>) -> CellTest {
        CellTest {
            id: id.to_string(),
            title: format!("test {}", id),
            description: String::new(),
            status: CellTestStatus::Processed,
            results,
        }
    }

    #[tokio::test]
    async fn test_results_filtered_by_cell_test() {
        let mock = MockCellTestApi::new();
        mock.set_cell_tests(
            "p1",
            vec![
                cell_test("ct1", vec![result("ct1", "12 cells")]),
                cell_test("ct2", vec![result("ct2", "3 cells")]),
            ],
        );

        let mut projector = ResultProjector::new(mock.service());
        assert_eq!(projector.load("p1").await.unwrap(), 2);

        let for_ct1 = projector.results_for("ct1");
        assert_eq!(for_ct1.len(), 1);
        assert_eq!(for_ct1[0].description, "12 cells");
        assert!(projector.results_for("ct3").is_empty());
    }

    #[tokio::test]
    async fn test_patient_change_refetches() {
        let mock = MockCellTestApi::new();
        mock.set_cell_tests("p1", vec![cell_test("ct1", vec![result("ct1", "r1")])]);
        mock.set_cell_tests("p2", vec![cell_test("ct9", vec![result("ct9", "r9")])]);

        let mut projector = ResultProjector::new(mock.service());
        projector.load("p1").await.unwrap();
        assert_eq!(projector.results_for("ct1").len(), 1);

        projector.load("p2").await.unwrap();
        assert_eq!(mock.calls().list_cell_tests, 2);
        assert!(projector.results_for("ct1").is_empty());
        assert_eq!(projector.results_for("ct9").len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_patient_rejected() {
        let mock = MockCellTestApi::new();
        let mut projector = ResultProjector::new(mock.service());

        let err = projector.refresh().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.calls().list_cell_tests, 0);
    }
}

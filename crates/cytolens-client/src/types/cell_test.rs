//! Cell tests and their server-computed results.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Processing status of a cell test as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CellTestStatus {
    /// Created, no detection run yet.
    Pending,
    /// A detection run is in progress server-side.
    Processing,
    /// At least one detection run completed.
    Processed,
    /// Unrecognized status value.
    #[serde(other)]
    Unknown,
}

/// A unit of work under which images are collected and processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellTest {
    /// Server-assigned identifier.
    pub id: String,
    /// Short title shown in listings.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Current processing status.
    pub status: CellTestStatus,
    /// Detection results computed so far.
    #[serde(default)]
    pub results: Vec<TestResult>,
}

/// A server-computed detection outcome for one cell test.
///
/// Results are read-only snapshots; the client fetches and filters them but
/// never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Human-readable outcome description.
    #[serde(default)]
    pub description: String,
    /// When the server produced this result.
    pub created_at: Timestamp,
    /// Identifier of the cell test this result belongs to.
    pub celltest_id: String,
    /// Images produced by the detection run.
    #[serde(default)]
    pub result_images: Vec<ResultImage>,
}

/// One image attached to a detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultImage {
    /// Server-assigned image identifier.
    pub id: String,
    /// Image locator, rewritten to absolute form by the provider.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_test_wire_shape() {
        let json = r#"{
            "id": "ct1",
            "title": "Blood smear",
            "status": "processed",
            "results": [{
                "description": "12 cells detected",
                "created_at": "2026-01-15T10:30:00Z",
                "celltest_id": "ct1",
                "result_images": [{"id": "r1", "image": "img/r1.png"}]
            }]
        }"#;
        let test: CellTest = serde_json::from_str(json).unwrap();
        assert_eq!(test.status, CellTestStatus::Processed);
        assert_eq!(test.results.len(), 1);
        assert_eq!(test.results[0].celltest_id, "ct1");
        assert_eq!(test.results[0].result_images[0].id, "r1");
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let test: CellTest = serde_json::from_str(
            r#"{"id": "ct2", "title": "t", "status": "archived"}"#,
        )
        .unwrap();
        assert_eq!(test.status, CellTestStatus::Unknown);
        assert!(test.results.is_empty());
    }
}

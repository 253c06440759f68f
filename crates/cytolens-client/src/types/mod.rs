//! Data types for the cell-test artifact lifecycle.
//!
//! Wire types ([`ImageRecord`], [`CellTest`], [`TestResult`], [`ProcessAck`])
//! mirror the payloads of the REST resource API; client-side types
//! ([`Artifact`], [`ProcessingRun`]) carry the lifecycle state the server
//! never sees.

mod artifact;
mod cell_test;
mod image;
mod processing;
mod validation;

pub use artifact::{Artifact, ArtifactId, ArtifactState};
pub use cell_test::{CellTest, CellTestStatus, ResultImage, TestResult};
pub use image::{ImageFile, ImageRecord};
pub use processing::{ProcessAck, ProcessingRun, ProcessingStatus};
pub use validation::ValidationError;

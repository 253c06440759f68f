//! Convenience re-exports of the most commonly used types.

pub use crate::api::{ApiService, CellTestApi};
pub use crate::client::{ClientConfig, RequestScope, ScopedClient};
pub use crate::coordinator::{
    DeleteOutcome, DeletionCoordinator, ProcessingCoordinator, UploadCoordinator, UploadReceipt,
};
pub use crate::error::{Error, Result};
pub use crate::results::ResultProjector;
pub use crate::session::{MemorySession, SessionProvider};
pub use crate::store::ArtifactStore;
pub use crate::types::{
    Artifact, ArtifactId, ArtifactState, CellTest, CellTestStatus, ImageFile, ImageRecord,
    ProcessAck, ProcessingRun, ProcessingStatus, ResultImage, TestResult, ValidationError,
};
pub use crate::workspace::CellTestWorkspace;

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations.
///
/// Use this target for logging client construction, request building, and
/// transport-level errors.
pub const TRACING_TARGET_CLIENT: &str = "cytolens_client::client";

/// Tracing target for artifact store mutations.
pub const TRACING_TARGET_STORE: &str = "cytolens_client::store";

/// Tracing target for upload/delete/processing coordinators.
pub const TRACING_TARGET_COORDINATOR: &str = "cytolens_client::coordinator";

/// Tracing target for result projection.
pub const TRACING_TARGET_RESULTS: &str = "cytolens_client::results";

mod api;
mod client;
mod coordinator;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
#[doc(hidden)]
pub mod prelude;
mod results;
mod session;
mod store;
pub mod types;
mod workspace;

pub use crate::api::{ApiService, CellTestApi};
pub use crate::client::{ClientConfig, ConfigBuilder, RequestScope, ScopedClient};
pub use crate::coordinator::{
    DeleteOutcome, DeletionCoordinator, ProcessingCoordinator, UploadCoordinator, UploadReceipt,
};
pub use crate::error::{Error, Result};
pub use crate::results::ResultProjector;
pub use crate::session::{MemorySession, SessionProvider};
pub use crate::store::ArtifactStore;
pub use crate::workspace::CellTestWorkspace;

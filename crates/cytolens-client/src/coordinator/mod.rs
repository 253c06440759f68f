//! Coordinators driving the artifact lifecycle.
//!
//! Each coordinator owns one kind of server round-trip and pushes the
//! confirmed outcome into the artifact store. Only one coordinator mutates
//! the store per call; exclusive `&mut` access rules out racing writes to
//! the same artifact.

mod delete;
mod process;
mod upload;

pub use delete::{DeleteOutcome, DeletionCoordinator};
pub use process::ProcessingCoordinator;
pub use upload::{UploadCoordinator, UploadReceipt};

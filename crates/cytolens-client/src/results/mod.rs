//! Read-through projection of server-computed results.

mod projector;

pub use projector::ResultProjector;

//! Adapter implementations for the task record API port.

pub mod backend;
pub mod memory;

pub use backend::{BackendError, RecordBackend};

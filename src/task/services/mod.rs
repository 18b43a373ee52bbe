//! Application services over the task record API.

mod error;
mod store;

pub use error::{RecordFailure, StoreError, StoreResult};
pub use store::TaskStore;

//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the task store and
//! the assignee directory.

pub mod record;
mod record_client;

pub use record::{
    FetchResponse, ID_FIELD, NAME_FIELD, OrderBy, QueryParams, Record, SortDirection,
    WriteResponse, WriteResult, record_id,
};
pub use record_client::{RecordClient, RecordClientError, RecordClientResult};

#[cfg(test)]
pub(crate) use record_client::MockRecordClient;

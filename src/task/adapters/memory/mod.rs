//! In-memory adapters for local development and tests.

mod record_client;

pub use record_client::InMemoryRecordClient;

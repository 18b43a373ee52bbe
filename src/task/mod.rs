//! Task and category data access for the task board.
//!
//! The module keeps a session-owned task list consistent with a generic record
//! API and derives every view (search, filters, completion groups, category
//! counts) from that list. It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Record translation in [`mapper`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod mapper;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Taskflow: task and category data access for a task board.
//!
//! This crate maps between the flat, suffixed records of a generic record
//! CRUD API and the application's task and category model, and keeps derived
//! view state consistent as tasks change.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task and category values with no infrastructure
//!   dependencies
//! - **Ports**: The record API contract the store depends on
//! - **Adapters**: An in-memory record API and the configuration-selected
//!   backend
//!
//! # Modules
//!
//! - [`task`]: Record mapping and the task store
//! - [`assignee`]: Self-seeding assignee directory
//! - [`config`]: Backend selection and timeouts

pub mod assignee;
pub mod config;
pub mod task;

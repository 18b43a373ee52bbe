//! Assignee directory over the `assignee_c` record entity.
//!
//! The directory seeds a fixed set of assignees the first time it finds the
//! entity empty, then serves reads and writes through the same record API
//! as the task store.

mod directory;
mod domain;

pub use directory::{AssigneeDirectory, AssigneeError, AssigneeResult};
pub use domain::{Assignee, AssigneeId, INITIAL_ASSIGNEES};

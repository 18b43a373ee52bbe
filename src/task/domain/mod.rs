//! Domain model for tasks and categories.
//!
//! Tasks reference categories by display name. The model carries no
//! persistence concerns; record shapes live behind the ports.

mod category;
mod error;
mod ids;
mod payload;
mod task;
mod view;

pub use category::{Category, DEFAULT_CATEGORY_COLOR, resolve_category_id};
pub use error::ParsePriorityError;
pub use ids::{CategoryId, TaskId};
pub use payload::{NewTask, TaskPatch};
pub use task::{CompletionChange, PersistedTaskData, Priority, Task, listing_order};
pub use view::{CompletionPartition, TaskQuery, TaskStats, normalize_search};

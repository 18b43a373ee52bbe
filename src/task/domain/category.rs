//! Category value object.

use super::{CategoryId, Task};
use serde::{Deserialize, Serialize};

/// Colour applied to categories that do not specify one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

/// A task category.
///
/// Tasks refer to categories by name. `task_count` is derived from the task
/// list at read time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: CategoryId,
    name: String,
    color: String,
    task_count: usize,
}

impl Category {
    /// Creates a category with a zero task count.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            task_count: 0,
        }
    }

    /// Returns a copy whose task count reflects `tasks`.
    #[must_use]
    pub fn counted(mut self, tasks: &[Task]) -> Self {
        self.task_count = tasks
            .iter()
            .filter(|task| task.category() == self.name)
            .count();
        self
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the number of tasks referencing this category by name.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.task_count
    }
}

/// Resolves a category name to its identifier.
///
/// Empty or unknown names resolve to `None`.
#[must_use]
pub fn resolve_category_id(name: &str, categories: &[Category]) -> Option<CategoryId> {
    if name.is_empty() {
        return None;
    }
    categories
        .iter()
        .find(|category| category.name == name)
        .map(Category::id)
}

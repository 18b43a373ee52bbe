//! Shared fixtures for in-memory task store integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::config::StoreConfig;
use taskflow::task::{adapters::RecordBackend, domain::Task, services::TaskStore};

/// Store type used by the integration tests.
pub type TestStore = TaskStore<RecordBackend, DefaultClock>;

/// Provides an unloaded store over the bundled sample data.
///
/// # Panics
///
/// Panics if the sample data cannot be loaded.
#[fixture]
pub fn sample_store() -> TestStore {
    TaskStore::from_config(&StoreConfig::default(), None).expect("sample backend should load")
}

/// Provides an unloaded store over an empty in-memory backend.
///
/// # Panics
///
/// Panics if the backend cannot be built.
#[fixture]
pub fn empty_store() -> TestStore {
    TaskStore::from_config(&StoreConfig::empty_memory(), None)
        .expect("empty backend should build")
}

/// Returns the raw identifiers of `tasks` in order.
pub fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|task| task.id().value()).collect()
}

/// Returns the task count of the named category, if it exists.
pub fn category_count(store: &TestStore, name: &str) -> Option<usize> {
    store
        .list_categories()
        .iter()
        .find(|category| category.name() == name)
        .map(taskflow::task::domain::Category::task_count)
}

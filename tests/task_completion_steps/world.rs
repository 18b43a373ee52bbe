//! Shared world state for task completion BDD scenarios.

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::config::StoreConfig;
use taskflow::task::{
    adapters::RecordBackend,
    domain::Task,
    services::{StoreError, TaskStore},
};

/// Store type used by the BDD world.
pub type TestStore = TaskStore<RecordBackend, DefaultClock>;

/// Scenario world for task completion behaviour tests.
pub struct TaskCompletionWorld {
    pub store: Option<TestStore>,
    pub last_result: Option<Result<Task, StoreError>>,
}

impl TaskCompletionWorld {
    /// Creates a world with no store loaded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store: None,
            last_result: None,
        }
    }

    /// Returns the loaded store.
    ///
    /// # Errors
    ///
    /// Returns an error if no store has been loaded by a given step.
    pub fn store(&self) -> Result<&TestStore, eyre::Report> {
        self.store
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task store in scenario world"))
    }
}

impl Default for TaskCompletionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCompletionWorld {
    TaskCompletionWorld::default()
}

/// Builds the sample-data store configuration used by every scenario.
pub fn sample_config() -> StoreConfig {
    StoreConfig::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

//! Given steps for task completion BDD scenarios.

use super::world::{TaskCompletionWorld, run_async, sample_config};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::task::services::TaskStore;

#[given("a task store loaded with sample data")]
fn store_with_sample_data(world: &mut TaskCompletionWorld) -> Result<(), eyre::Report> {
    let store = TaskStore::from_config(&sample_config(), None)
        .wrap_err("build sample-data task store")?;
    run_async(store.refresh());
    world.store = Some(store);
    Ok(())
}

//! When steps for task completion BDD scenarios.

use super::world::{TaskCompletionWorld, run_async};
use rstest_bdd_macros::when;
use taskflow::task::domain::TaskId;

fn set_completion(
    world: &mut TaskCompletionWorld,
    task_id: u64,
    completed: bool,
) -> Result<(), eyre::Report> {
    let result = run_async(
        world
            .store()?
            .toggle_complete(TaskId::new(task_id), completed),
    );
    world.last_result = Some(result);
    Ok(())
}

#[when("task {task_id:u64} is marked complete")]
fn mark_complete(world: &mut TaskCompletionWorld, task_id: u64) -> Result<(), eyre::Report> {
    set_completion(world, task_id, true)
}

#[when("task {task_id:u64} is reopened")]
fn reopen(world: &mut TaskCompletionWorld, task_id: u64) -> Result<(), eyre::Report> {
    set_completion(world, task_id, false)
}

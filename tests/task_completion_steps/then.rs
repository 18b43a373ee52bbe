//! Then steps for task completion BDD scenarios.

use super::world::TaskCompletionWorld;
use rstest_bdd_macros::then;
use taskflow::task::{domain::TaskId, services::StoreError};

#[then("task {task_id:u64} is completed with a completion time")]
fn task_is_completed(world: &TaskCompletionWorld, task_id: u64) -> Result<(), eyre::Report> {
    let task = world
        .store()?
        .get(TaskId::new(task_id))
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from the store"))?;

    eyre::ensure!(task.is_completed(), "task {task_id} is still pending");
    eyre::ensure!(
        task.completed_at().is_some(),
        "task {task_id} has no completion time"
    );
    Ok(())
}

#[then("task {task_id:u64} is pending without a completion time")]
fn task_is_pending(world: &TaskCompletionWorld, task_id: u64) -> Result<(), eyre::Report> {
    let task = world
        .store()?
        .get(TaskId::new(task_id))
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from the store"))?;

    eyre::ensure!(!task.is_completed(), "task {task_id} is still completed");
    eyre::ensure!(
        task.completed_at().is_none(),
        "task {task_id} kept its completion time"
    );
    Ok(())
}

#[then("the completion rate is {rate:usize} percent")]
fn completion_rate_is(world: &TaskCompletionWorld, rate: usize) -> Result<(), eyre::Report> {
    let actual = world.store()?.stats().completion_rate;
    eyre::ensure!(actual == rate, "expected {rate}% completed, found {actual}%");
    Ok(())
}

#[then(r#"the pending tasks are listed as "{order}""#)]
fn pending_order_is(world: &TaskCompletionWorld, order: String) -> Result<(), eyre::Report> {
    let expected = order
        .split(',')
        .map(|id| id.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| eyre::eyre!("invalid expected order in scenario: {err}"))?;
    let actual: Vec<u64> = world
        .store()?
        .pending_tasks()
        .iter()
        .map(|task| task.id().value())
        .collect();

    eyre::ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}

#[then("the completion fails because the task was not found")]
fn completion_fails_not_found(world: &TaskCompletionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;

    if !matches!(result, Err(StoreError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}

#[then("the store still holds {count:usize} tasks")]
fn store_holds(world: &TaskCompletionWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.store()?.list_all().len();
    eyre::ensure!(actual == count, "expected {count} tasks, found {actual}");
    Ok(())
}

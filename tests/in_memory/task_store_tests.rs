//! In-memory integration tests for task store listing and mutation.

use super::helpers::{TestStore, empty_store, ids, sample_store};
use chrono::NaiveDate;
use rstest::rstest;
use taskflow::task::domain::{NewTask, Priority, TaskId, TaskPatch, TaskQuery};
use taskflow::task::services::StoreError;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sample_data_lists_pending_first_and_newest_first(sample_store: TestStore) {
    sample_store.refresh().await;

    assert_eq!(ids(&sample_store.list_all()), vec![4, 2, 1, 3, 5]);
    assert_eq!(ids(&sample_store.pending_tasks()), vec![4, 2, 1]);
    assert_eq!(ids(&sample_store.completed_tasks()), vec![3, 5]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sample_data_stats(sample_store: TestStore) {
    sample_store.refresh().await;
    let stats = sample_store.stats();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.high_priority_pending, 1);
    assert_eq!(stats.completion_rate, 40);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sample_tasks_carry_mapped_fields(sample_store: TestStore) {
    sample_store.refresh().await;
    let report = sample_store
        .get(TaskId::new(1))
        .expect("sample task 1 should be loaded");

    assert_eq!(report.title(), "Prepare quarterly report");
    assert_eq!(report.priority(), Priority::High);
    assert_eq!(report.category(), "Work");
    assert_eq!(report.due_date(), NaiveDate::from_ymd_opt(2024, 2, 15));
    assert!(!report.is_completed());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn combined_view_applies_every_criterion(sample_store: TestStore) {
    sample_store.refresh().await;

    let view = sample_store.view(
        &TaskQuery::new()
            .with_category("Work")
            .with_priority(Priority::High),
    );
    assert_eq!(ids(&view.pending), vec![1]);
    assert_eq!(ids(&view.completed), vec![5]);

    let narrowed = sample_store.view(
        &TaskQuery::new()
            .with_search("QUARTERLY")
            .with_category("Work"),
    );
    assert_eq!(ids(&narrowed.pending), vec![1]);
    assert!(narrowed.completed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_survives_refresh(empty_store: TestStore) {
    empty_store.refresh().await;
    assert!(empty_store.list_all().is_empty());

    let created = empty_store
        .create(NewTask::new("Water plants").with_description("Balcony first"))
        .await
        .expect("task creation should succeed");
    assert_eq!(created.id(), TaskId::new(1));

    empty_store.refresh().await;
    let reloaded = empty_store
        .get(created.id())
        .expect("created task should reload");
    assert_eq!(reloaded.title(), "Water plants");
    assert_eq!(reloaded.description(), "Balcony first");
    assert_eq!(reloaded.created_at(), created.created_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_round_trips_through_persistence(sample_store: TestStore) {
    sample_store.refresh().await;

    let completed = sample_store
        .toggle_complete(TaskId::new(4), true)
        .await
        .expect("completion should succeed");
    sample_store.refresh().await;
    let reloaded = sample_store
        .get(TaskId::new(4))
        .expect("task 4 should reload");

    assert!(reloaded.is_completed());
    assert_eq!(reloaded.completed_at(), completed.completed_at());
    assert_eq!(ids(&sample_store.completed_tasks()).first(), Some(&4));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_mutations_are_reported(sample_store: TestStore) {
    sample_store.refresh().await;
    let before = sample_store.list_all();

    let update = sample_store
        .update(TaskId::new(9999), TaskPatch::new().with_title("Ghost"))
        .await;
    let deleted = sample_store
        .delete(TaskId::new(9999))
        .await
        .expect("unknown delete is not an error");

    assert!(matches!(update, Err(StoreError::NotFound(_))));
    assert!(!deleted);
    assert_eq!(sample_store.list_all(), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_delete_removes_every_target(sample_store: TestStore) {
    sample_store.refresh().await;

    let removed = sample_store
        .delete_many(&[TaskId::new(3), TaskId::new(5), TaskId::new(404)])
        .await
        .expect("batch delete should succeed");

    assert_eq!(ids(&removed), vec![3, 5]);
    assert!(sample_store.completed_tasks().is_empty());
    assert_eq!(sample_store.stats().completion_rate, 0);
}

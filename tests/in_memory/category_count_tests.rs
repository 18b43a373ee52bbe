//! In-memory integration tests for category task counts.

use super::helpers::{TestStore, category_count, sample_store};
use rstest::rstest;
use taskflow::task::domain::{NewTask, TaskId, TaskPatch};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sample_categories_are_counted_and_sorted(sample_store: TestStore) {
    sample_store.refresh().await;
    let categories = sample_store.list_categories();

    let names: Vec<&str> = categories.iter().map(|category| category.name()).collect();
    assert_eq!(names, vec!["Errands", "Health", "Personal", "Work"]);
    assert_eq!(category_count(&sample_store, "Work"), Some(2));
    assert_eq!(category_count(&sample_store, "Health"), Some(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn counts_follow_create_move_and_delete(sample_store: TestStore) {
    sample_store.refresh().await;

    let created = sample_store
        .create(NewTask::new("Renew gym pass").with_category("Health"))
        .await
        .expect("task creation should succeed");
    assert_eq!(category_count(&sample_store, "Health"), Some(2));

    sample_store
        .update(created.id(), TaskPatch::new().with_category("Personal"))
        .await
        .expect("recategorisation should succeed");
    assert_eq!(category_count(&sample_store, "Health"), Some(1));
    assert_eq!(category_count(&sample_store, "Personal"), Some(2));

    sample_store
        .delete(TaskId::new(1))
        .await
        .expect("delete should succeed");
    assert_eq!(category_count(&sample_store, "Work"), Some(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_category_is_counted_nowhere(sample_store: TestStore) {
    sample_store.refresh().await;

    let created = sample_store
        .create(NewTask::new("Learn juggling").with_category("Hobbies"))
        .await
        .expect("task creation should succeed");

    assert_eq!(created.category(), "Hobbies");
    assert_eq!(category_count(&sample_store, "Hobbies"), None);
    let total: usize = sample_store
        .list_categories()
        .iter()
        .map(taskflow::task::domain::Category::task_count)
        .sum();
    assert_eq!(total, 5);
}

//! Shared tests for BatchManifestRepo implementations

use uuid::Uuid;

use crate::{db::repos::BatchManifestRepo, models::NewBatchManifest};

fn manifest(task_id: Uuid, project_id: i64, session_ids: Vec<i64>) -> NewBatchManifest {
    NewBatchManifest {
        task_id,
        batch_id: Uuid::new_v4(),
        project_id,
        dry_run: false,
        session_ids,
    }
}

pub async fn test_insert_and_read_batch(repo: &dyn BatchManifestRepo) {
    let task_id = Uuid::new_v4();
    let batch = manifest(task_id, 1, vec![30, 10, 20]);

    let inserted = repo.insert_batch(&batch).await.expect("insert batch");
    assert_eq!(inserted, 3);

    let ids = repo
        .session_ids_in_batch(task_id, batch.batch_id)
        .await
        .expect("read batch");
    assert_eq!(ids, vec![10, 20, 30]);
}

pub async fn test_empty_batch_writes_nothing(repo: &dyn BatchManifestRepo) {
    let task_id = Uuid::new_v4();
    let batch = manifest(task_id, 1, vec![]);

    assert_eq!(repo.insert_batch(&batch).await.expect("insert"), 0);
    assert_eq!(repo.count_sessions_in_task(task_id).await.expect("count"), 0);
    assert!(repo.list_batches(task_id).await.expect("list").is_empty());
}

pub async fn test_unknown_batch_is_empty(repo: &dyn BatchManifestRepo) {
    let ids = repo
        .session_ids_in_batch(Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect("read unknown batch");
    assert!(ids.is_empty());
}

pub async fn test_batches_are_scoped_by_task_and_batch(repo: &dyn BatchManifestRepo) {
    let task_a = Uuid::new_v4();
    let task_b = Uuid::new_v4();
    let first = manifest(task_a, 1, vec![1, 2]);
    let second = manifest(task_a, 1, vec![3, 4]);
    let other_task = manifest(task_b, 1, vec![1, 2]);

    repo.insert_batch(&first).await.expect("insert first");
    repo.insert_batch(&second).await.expect("insert second");
    repo.insert_batch(&other_task).await.expect("insert other task");

    assert_eq!(
        repo.session_ids_in_batch(task_a, first.batch_id).await.unwrap(),
        vec![1, 2]
    );
    assert_eq!(
        repo.session_ids_in_batch(task_a, second.batch_id).await.unwrap(),
        vec![3, 4]
    );
    // Right batch id, wrong task
    assert!(
        repo.session_ids_in_batch(task_b, first.batch_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(repo.count_sessions_in_task(task_a).await.unwrap(), 4);
    assert_eq!(repo.count_sessions_in_task(task_b).await.unwrap(), 2);
}

pub async fn test_duplicate_session_in_task_rejected(repo: &dyn BatchManifestRepo) {
    let task_id = Uuid::new_v4();
    let first = manifest(task_id, 1, vec![1, 2, 3]);
    let overlapping = manifest(task_id, 1, vec![3, 4]);

    repo.insert_batch(&first).await.expect("insert first");
    let result = repo.insert_batch(&overlapping).await;
    assert!(result.is_err(), "overlapping batch must be rejected");

    // The failed batch left no partial rows behind
    assert!(
        repo.session_ids_in_batch(task_id, overlapping.batch_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(repo.count_sessions_in_task(task_id).await.unwrap(), 3);
}

pub async fn test_list_batches_in_enumeration_order(repo: &dyn BatchManifestRepo) {
    let task_id = Uuid::new_v4();
    let mut first = manifest(task_id, 9, vec![1, 2]);
    first.dry_run = true;
    let mut second = manifest(task_id, 9, vec![5, 6]);
    second.dry_run = true;

    // Insert out of order; listing follows the session id ranges
    repo.insert_batch(&second).await.unwrap();
    repo.insert_batch(&first).await.unwrap();

    let batches = repo.list_batches(task_id).await.unwrap();
    assert_eq!(batches, vec![first.handle(), second.handle()]);
}

/// A full search page: well past the per-statement row count SQLite allows
/// with 5 parameters per row under a 999-variable limit.
pub async fn test_large_batch(repo: &dyn BatchManifestRepo) {
    let task_id = Uuid::new_v4();
    let ids: Vec<i64> = (1..=10_000).collect();
    let batch = manifest(task_id, 1, ids.clone());

    assert_eq!(repo.insert_batch(&batch).await.unwrap(), 10_000);
    assert_eq!(
        repo.session_ids_in_batch(task_id, batch.batch_id).await.unwrap(),
        ids
    );
}

#[cfg(feature = "database-sqlite")]
mod sqlite_tests {
    use crate::db::{
        sqlite::SqliteBatchManifestRepo,
        tests::harness::{create_sqlite_pool, run_sqlite_migrations},
    };

    async fn create_repo() -> SqliteBatchManifestRepo {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        SqliteBatchManifestRepo::new(pool)
    }

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let repo = create_repo().await;
                super::$name(&repo).await;
            }
        };
    }

    sqlite_test!(test_insert_and_read_batch);
    sqlite_test!(test_empty_batch_writes_nothing);
    sqlite_test!(test_unknown_batch_is_empty);
    sqlite_test!(test_batches_are_scoped_by_task_and_batch);
    sqlite_test!(test_duplicate_session_in_task_rejected);
    sqlite_test!(test_list_batches_in_enumeration_order);
    sqlite_test!(test_large_batch);
}

#[cfg(feature = "database-postgres")]
mod postgres_tests {
    use crate::db::{
        postgres::PostgresBatchManifestRepo,
        tests::harness::postgres::{create_isolated_postgres_pool, run_postgres_migrations},
    };

    macro_rules! postgres_test {
        ($name:ident) => {
            #[tokio::test]
            #[ignore = "Requires Docker - run with `cargo test -- --ignored`"]
            async fn $name() {
                let pool = create_isolated_postgres_pool().await;
                run_postgres_migrations(&pool).await;
                let repo = PostgresBatchManifestRepo::new(pool, None);
                super::$name(&repo).await;
            }
        };
    }

    postgres_test!(test_insert_and_read_batch);
    postgres_test!(test_empty_batch_writes_nothing);
    postgres_test!(test_unknown_batch_is_empty);
    postgres_test!(test_batches_are_scoped_by_task_and_batch);
    postgres_test!(test_duplicate_session_in_task_rejected);
    postgres_test!(test_list_batches_in_enumeration_order);
    postgres_test!(test_large_batch);
}

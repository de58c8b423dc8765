//! Shared tests for SessionRepo implementations

use super::harness::SessionFixtures;
use crate::{db::repos::SessionRepo, models::SessionDeleteCounts};

pub struct SessionTestContext<'a> {
    pub repo: &'a dyn SessionRepo,
    pub fixtures: &'a dyn SessionFixtures,
}

pub async fn test_delete_removes_sessions_and_fields(ctx: &SessionTestContext<'_>) {
    ctx.fixtures.seed_sessions(1, &[1, 2, 3, 4], 3).await;

    let counts = ctx.repo.delete_by_ids(&[1, 3]).await.expect("delete");
    assert_eq!(
        counts,
        SessionDeleteCounts {
            fields: 6,
            sessions: 2
        }
    );
    assert_eq!(ctx.fixtures.count_sessions().await, 2);
    assert_eq!(ctx.fixtures.count_session_fields().await, 6);
}

pub async fn test_delete_is_idempotent(ctx: &SessionTestContext<'_>) {
    ctx.fixtures.seed_sessions(1, &[10, 11], 2).await;

    let first = ctx.repo.delete_by_ids(&[10, 11]).await.expect("first delete");
    assert_eq!(first.sessions, 2);

    let second = ctx.repo.delete_by_ids(&[10, 11]).await.expect("second delete");
    assert_eq!(second, SessionDeleteCounts::default());
}

pub async fn test_delete_unknown_ids(ctx: &SessionTestContext<'_>) {
    ctx.fixtures.seed_sessions(1, &[1], 1).await;

    let counts = ctx.repo.delete_by_ids(&[99, 100]).await.expect("delete");
    assert_eq!(counts, SessionDeleteCounts::default());
    assert_eq!(ctx.fixtures.count_sessions().await, 1);
}

pub async fn test_delete_empty_list(ctx: &SessionTestContext<'_>) {
    ctx.fixtures.seed_sessions(1, &[1], 1).await;

    let counts = ctx.repo.delete_by_ids(&[]).await.expect("delete");
    assert_eq!(counts, SessionDeleteCounts::default());
    assert_eq!(ctx.fixtures.count_sessions().await, 1);
}

pub async fn test_delete_session_without_fields(ctx: &SessionTestContext<'_>) {
    ctx.fixtures.seed_sessions(1, &[5], 0).await;

    let counts = ctx.repo.delete_by_ids(&[5]).await.expect("delete");
    assert_eq!(
        counts,
        SessionDeleteCounts {
            fields: 0,
            sessions: 1
        }
    );
}

pub async fn test_delete_many(ctx: &SessionTestContext<'_>) {
    let ids: Vec<i64> = (1..=2_100).collect();
    ctx.fixtures.seed_sessions(1, &ids, 1).await;

    let counts = ctx.repo.delete_by_ids(&ids).await.expect("delete");
    assert_eq!(counts.sessions, 2_100);
    assert_eq!(counts.fields, 2_100);
    assert_eq!(ctx.fixtures.count_sessions().await, 0);
}

#[cfg(feature = "database-sqlite")]
mod sqlite_tests {
    use super::*;
    use crate::db::{
        sqlite::SqliteSessionRepo,
        tests::harness::{SqliteSessionFixtures, create_sqlite_pool, run_sqlite_migrations},
    };

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let pool = create_sqlite_pool().await;
                run_sqlite_migrations(&pool).await;
                let fixtures = SqliteSessionFixtures(pool.clone());
                fixtures.create_session_tables().await;
                let repo = SqliteSessionRepo::new(pool);
                let ctx = SessionTestContext {
                    repo: &repo,
                    fixtures: &fixtures,
                };
                super::$name(&ctx).await;
            }
        };
    }

    sqlite_test!(test_delete_removes_sessions_and_fields);
    sqlite_test!(test_delete_is_idempotent);
    sqlite_test!(test_delete_unknown_ids);
    sqlite_test!(test_delete_empty_list);
    sqlite_test!(test_delete_session_without_fields);
    sqlite_test!(test_delete_many);
}

#[cfg(feature = "database-postgres")]
mod postgres_tests {
    use super::*;
    use crate::db::{
        postgres::PostgresSessionRepo,
        tests::harness::postgres::{
            PostgresSessionFixtures, create_isolated_postgres_pool, run_postgres_migrations,
        },
    };

    macro_rules! postgres_test {
        ($name:ident) => {
            #[tokio::test]
            #[ignore = "Requires Docker - run with `cargo test -- --ignored`"]
            async fn $name() {
                let pool = create_isolated_postgres_pool().await;
                run_postgres_migrations(&pool).await;
                let fixtures = PostgresSessionFixtures(pool.clone());
                fixtures.create_session_tables().await;
                let repo = PostgresSessionRepo::new(pool);
                let ctx = SessionTestContext {
                    repo: &repo,
                    fixtures: &fixtures,
                };
                super::$name(&ctx).await;
            }
        };
    }

    postgres_test!(test_delete_removes_sessions_and_fields);
    postgres_test!(test_delete_is_idempotent);
    postgres_test!(test_delete_unknown_ids);
    postgres_test!(test_delete_empty_list);
    postgres_test!(test_delete_session_without_fields);
    postgres_test!(test_delete_many);
}

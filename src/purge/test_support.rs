//! Shared fixture for stage tests: in-memory fakes plus SQLite.

use std::sync::Arc;

use super::{PurgeHandlers, PurgeSettings};
use crate::{
    db::{
        DbPool,
        tests::harness::{
            SessionFixtures, SqliteSessionFixtures, create_sqlite_pool, run_sqlite_migrations,
        },
    },
    email::test::RecordingEmailSender,
    models::{BatchIdResponse, DeletionRequest},
    search::test::InMemorySearchIndex,
    storage::test::InMemoryObjectStore,
};

pub struct PurgeFixture {
    pub handlers: PurgeHandlers,
    pub db: Arc<DbPool>,
    pub search: Arc<InMemorySearchIndex>,
    pub store: Arc<InMemoryObjectStore>,
    pub email: Arc<RecordingEmailSender>,
    pub sessions: SqliteSessionFixtures,
}

pub fn settings(page_size: usize) -> PurgeSettings {
    PurgeSettings {
        page_size,
        environment_prefix: "dev/".to_string(),
        from_address: "noreply@example.com".to_string(),
        sessions_deleted_template_id: "d-sessions-deleted".to_string(),
        ..Default::default()
    }
}

pub fn request(project_id: i64, dry_run: bool) -> DeletionRequest {
    DeletionRequest {
        project_id,
        query: r#"{"match_all":{}}"#.to_string(),
        dry_run,
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
    }
}

impl PurgeFixture {
    pub async fn new(page_size: usize) -> Self {
        Self::build(page_size, RecordingEmailSender::default()).await
    }

    pub async fn with_email(email: RecordingEmailSender) -> Self {
        Self::build(10, email).await
    }

    /// Handlers with a database but no search index.
    pub async fn without_search(page_size: usize) -> Self {
        let mut fixture = Self::new(page_size).await;
        fixture.handlers = PurgeHandlers {
            db: Some(fixture.db.clone()),
            search: None,
            objects: Some(fixture.store.clone()),
            email: Some(fixture.email.clone()),
            settings: settings(page_size),
        };
        fixture
    }

    async fn build(page_size: usize, email: RecordingEmailSender) -> Self {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        let sessions = SqliteSessionFixtures(pool.clone());
        sessions.create_session_tables().await;

        let db = Arc::new(DbPool::from_sqlite(pool));
        let search = Arc::new(InMemorySearchIndex::new());
        let store = Arc::new(InMemoryObjectStore::new());
        let email = Arc::new(email);

        let handlers = PurgeHandlers::new(
            db.clone(),
            search.clone(),
            store.clone(),
            email.clone(),
            settings(page_size),
        );

        Self {
            handlers,
            db,
            search,
            store,
            email,
            sessions,
        }
    }

    /// Index sessions and write their database rows.
    pub async fn seed(&self, project_id: i64, session_ids: &[i64], fields_per_session: i64) {
        self.search
            .add_sessions(project_id, session_ids.iter().copied());
        self.sessions
            .seed_sessions(project_id, session_ids, fields_per_session)
            .await;
    }

    pub async fn enumerate(&self, request: &DeletionRequest) -> Vec<BatchIdResponse> {
        self.handlers
            .get_session_ids_by_query(request)
            .await
            .expect("enumeration failed")
    }

    pub async fn manifest_ids(&self, batch: &BatchIdResponse) -> Vec<i64> {
        self.db
            .manifests()
            .session_ids_in_batch(batch.task_id, batch.batch_id)
            .await
            .expect("manifest read failed")
    }

    pub async fn manifest_row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM delete_sessions_tasks")
            .fetch_one(&self.sessions.0)
            .await
            .expect("count failed")
    }
}

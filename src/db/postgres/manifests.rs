use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{error::DbResult, repos::BatchManifestRepo},
    models::{BatchIdResponse, NewBatchManifest},
};

pub struct PostgresBatchManifestRepo {
    write_pool: PgPool,
    read_pool: PgPool,
}

impl PostgresBatchManifestRepo {
    pub fn new(write_pool: PgPool, read_pool: Option<PgPool>) -> Self {
        let read_pool = read_pool.unwrap_or_else(|| write_pool.clone());
        Self {
            write_pool,
            read_pool,
        }
    }
}

#[async_trait]
impl BatchManifestRepo for PostgresBatchManifestRepo {
    async fn insert_batch(&self, manifest: &NewBatchManifest) -> DbResult<u64> {
        if manifest.session_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO delete_sessions_tasks (task_id, batch_id, project_id, dry_run, session_id)
            SELECT $1, $2, $3, $4, UNNEST($5::BIGINT[])
            "#,
        )
        .bind(manifest.task_id)
        .bind(manifest.batch_id)
        .bind(manifest.project_id)
        .bind(manifest.dry_run)
        .bind(manifest.session_ids.as_slice())
        .execute(&self.write_pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn session_ids_in_batch(&self, task_id: Uuid, batch_id: Uuid) -> DbResult<Vec<i64>> {
        // Reads the primary: a lagging replica would make a fresh batch look empty.
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT session_id FROM delete_sessions_tasks
            WHERE task_id = $1 AND batch_id = $2
            ORDER BY session_id
            "#,
        )
        .bind(task_id)
        .bind(batch_id)
        .fetch_all(&self.write_pool)
        .await?;

        Ok(ids)
    }

    async fn list_batches(&self, task_id: Uuid) -> DbResult<Vec<BatchIdResponse>> {
        let rows = sqlx::query_as::<_, (Uuid, i64, bool)>(
            r#"
            SELECT batch_id, project_id, dry_run FROM delete_sessions_tasks
            WHERE task_id = $1
            GROUP BY batch_id, project_id, dry_run
            ORDER BY MIN(session_id)
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.read_pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(batch_id, project_id, dry_run)| BatchIdResponse {
                project_id,
                task_id,
                batch_id,
                dry_run,
            })
            .collect())
    }

    async fn count_sessions_in_task(&self, task_id: Uuid) -> DbResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delete_sessions_tasks WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(&self.read_pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}

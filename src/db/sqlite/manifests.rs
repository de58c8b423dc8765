use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{MANIFEST_ROWS_PER_INSERT, common::parse_uuid};
use crate::{
    db::{error::DbResult, repos::BatchManifestRepo},
    models::{BatchIdResponse, NewBatchManifest},
};

pub struct SqliteBatchManifestRepo {
    pool: SqlitePool,
}

impl SqliteBatchManifestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchManifestRepo for SqliteBatchManifestRepo {
    async fn insert_batch(&self, manifest: &NewBatchManifest) -> DbResult<u64> {
        if manifest.session_ids.is_empty() {
            return Ok(0);
        }

        let task_id = manifest.task_id.to_string();
        let batch_id = manifest.batch_id.to_string();
        let mut inserted = 0;

        let mut tx = self.pool.begin().await?;
        for chunk in manifest.session_ids.chunks(MANIFEST_ROWS_PER_INSERT) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO delete_sessions_tasks (task_id, batch_id, project_id, dry_run, session_id) ",
            );
            builder.push_values(chunk, |mut row, session_id| {
                row.push_bind(task_id.clone())
                    .push_bind(batch_id.clone())
                    .push_bind(manifest.project_id)
                    .push_bind(manifest.dry_run)
                    .push_bind(*session_id);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn session_ids_in_batch(&self, task_id: Uuid, batch_id: Uuid) -> DbResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT session_id FROM delete_sessions_tasks
            WHERE task_id = ? AND batch_id = ?
            ORDER BY session_id
            "#,
        )
        .bind(task_id.to_string())
        .bind(batch_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn list_batches(&self, task_id: Uuid) -> DbResult<Vec<BatchIdResponse>> {
        let rows = sqlx::query_as::<_, (String, i64, bool)>(
            r#"
            SELECT batch_id, project_id, dry_run FROM delete_sessions_tasks
            WHERE task_id = ?
            GROUP BY batch_id, project_id, dry_run
            ORDER BY MIN(session_id)
            "#,
        )
        .bind(task_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(batch_id, project_id, dry_run)| {
                Ok(BatchIdResponse {
                    project_id,
                    task_id,
                    batch_id: parse_uuid(&batch_id)?,
                    dry_run,
                })
            })
            .collect()
    }

    async fn count_sessions_in_task(&self, task_id: Uuid) -> DbResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delete_sessions_tasks WHERE task_id = ?")
                .bind(task_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::{error::DbResult, repos::SessionRepo},
    models::SessionDeleteCounts,
};

pub struct PostgresSessionRepo {
    write_pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(write_pool: PgPool) -> Self {
        Self { write_pool }
    }
}

#[async_trait]
impl SessionRepo for PostgresSessionRepo {
    async fn delete_by_ids(&self, session_ids: &[i64]) -> DbResult<SessionDeleteCounts> {
        if session_ids.is_empty() {
            return Ok(SessionDeleteCounts::default());
        }

        let mut tx = self.write_pool.begin().await?;

        let fields = sqlx::query("DELETE FROM session_fields WHERE session_id = ANY($1)")
            .bind(session_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let sessions = sqlx::query("DELETE FROM sessions WHERE id = ANY($1)")
            .bind(session_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(SessionDeleteCounts { fields, sessions })
    }
}

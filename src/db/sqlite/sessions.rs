use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::IDS_PER_DELETE;
use crate::{
    db::{error::DbResult, repos::SessionRepo},
    models::SessionDeleteCounts,
};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// `DELETE FROM {table} WHERE {column} IN (?, ?, ...)`
fn delete_in<'a>(table: &str, column: &str, ids: &'a [i64]) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("DELETE FROM {table} WHERE {column} IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    builder
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn delete_by_ids(&self, session_ids: &[i64]) -> DbResult<SessionDeleteCounts> {
        let mut counts = SessionDeleteCounts::default();
        if session_ids.is_empty() {
            return Ok(counts);
        }

        let mut tx = self.pool.begin().await?;

        for chunk in session_ids.chunks(IDS_PER_DELETE) {
            counts.fields += delete_in("session_fields", "session_id", chunk)
                .build()
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        for chunk in session_ids.chunks(IDS_PER_DELETE) {
            counts.sessions += delete_in("sessions", "id", chunk)
                .build()
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        Ok(counts)
    }
}

use async_trait::async_trait;

use crate::{db::error::DbResult, models::SessionDeleteCounts};

#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Delete the given sessions and their `session_fields` rows.
    ///
    /// Dependent rows are removed before the parent rows, inside one
    /// transaction. Ids with no rows are skipped silently, so re-running a
    /// batch is a no-op. An empty id list issues no statements.
    async fn delete_by_ids(&self, session_ids: &[i64]) -> DbResult<SessionDeleteCounts>;
}

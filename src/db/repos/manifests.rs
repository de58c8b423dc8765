use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{BatchIdResponse, NewBatchManifest},
};

/// Durable record of which session ids belong to which (task, batch) pair.
///
/// Rows are written once by the enumerator and only read afterwards.
#[async_trait]
pub trait BatchManifestRepo: Send + Sync {
    /// Persist one row per session id in the batch.
    ///
    /// All rows are written in a single statement or transaction. A session id
    /// already present in the same task is rejected by a unique constraint.
    /// Returns the number of rows written.
    async fn insert_batch(&self, manifest: &NewBatchManifest) -> DbResult<u64>;

    /// Session ids recorded for a batch, in ascending order.
    ///
    /// An unknown batch yields an empty list.
    async fn session_ids_in_batch(&self, task_id: Uuid, batch_id: Uuid) -> DbResult<Vec<i64>>;

    /// Handles for every batch written for a task, in enumeration order.
    async fn list_batches(&self, task_id: Uuid) -> DbResult<Vec<BatchIdResponse>>;

    /// Number of sessions recorded across all batches of a task.
    async fn count_sessions_in_task(&self, task_id: Uuid) -> DbResult<u64>;
}

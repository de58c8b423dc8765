use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to one persisted batch manifest.
///
/// Deletion workers receive this handle rather than the session ids
/// themselves and resolve the ids from the manifest store when they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIdResponse {
    pub project_id: i64,
    /// Shared by every batch produced from one deletion request.
    pub task_id: Uuid,
    pub batch_id: Uuid,
    /// Propagated from the deletion request.
    pub dry_run: bool,
}

/// Rows to write for one batch: one manifest row per session id.
#[derive(Debug, Clone)]
pub struct NewBatchManifest {
    pub task_id: Uuid,
    pub batch_id: Uuid,
    pub project_id: i64,
    pub dry_run: bool,
    pub session_ids: Vec<i64>,
}

impl NewBatchManifest {
    /// The handle the deletion workers receive for this batch.
    pub fn handle(&self) -> BatchIdResponse {
        BatchIdResponse {
            project_id: self.project_id,
            task_id: self.task_id,
            batch_id: self.batch_id,
            dry_run: self.dry_run,
        }
    }
}

/// Rows removed by a relational delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDeleteCounts {
    /// `session_fields` rows removed.
    pub fields: u64,
    /// `sessions` rows removed.
    pub sessions: u64,
}

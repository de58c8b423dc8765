use tracing::{info, instrument};

use super::{PurgeError, PurgeHandlers, Stage, handlers::record_failure};
use crate::{models::BatchIdResponse, observability::metrics};

impl PurgeHandlers {
    /// Delete a batch's sessions and their field rows from the database.
    ///
    /// Field rows go first, then session rows, in one transaction. Ids that
    /// are already gone are skipped.
    #[instrument(
        skip(self, batch),
        fields(
            task_id = %batch.task_id,
            batch_id = %batch.batch_id,
            project_id = batch.project_id,
            dry_run = batch.dry_run
        )
    )]
    pub async fn delete_session_batch_from_database(
        &self,
        batch: BatchIdResponse,
    ) -> Result<BatchIdResponse, PurgeError> {
        self.delete_from_database(&batch)
            .await
            .inspect_err(record_failure)?;
        Ok(batch)
    }

    async fn delete_from_database(&self, batch: &BatchIdResponse) -> Result<(), PurgeError> {
        let db = self.db(Stage::Database)?;
        let session_ids = self.batch_session_ids(Stage::Database, batch).await?;

        if batch.dry_run {
            info!(
                sessions = session_ids.len(),
                "DRY RUN: Would delete sessions and session fields from database"
            );
            return Ok(());
        }

        let counts = db
            .sessions()
            .delete_by_ids(&session_ids)
            .await
            .map_err(|e| PurgeError::write(Stage::Database, "error deleting sessions", e))?;

        metrics::record_purge_deletion(Stage::Database.as_str(), counts.sessions);
        info!(
            requested = session_ids.len(),
            sessions_deleted = counts.sessions,
            fields_deleted = counts.fields,
            "Deleted sessions from database"
        );
        Ok(())
    }
}

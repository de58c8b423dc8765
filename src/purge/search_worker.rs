use tracing::{info, instrument};

use super::{PurgeError, PurgeHandlers, Stage, handlers::record_failure};
use crate::{models::BatchIdResponse, observability::metrics};

impl PurgeHandlers {
    /// Delete a batch's session documents from the search index.
    ///
    /// Documents are deleted one id at a time; the first failure abandons the
    /// rest of the batch.
    #[instrument(
        skip(self, batch),
        fields(
            task_id = %batch.task_id,
            batch_id = %batch.batch_id,
            project_id = batch.project_id,
            dry_run = batch.dry_run
        )
    )]
    pub async fn delete_session_batch_from_opensearch(
        &self,
        batch: BatchIdResponse,
    ) -> Result<BatchIdResponse, PurgeError> {
        self.delete_from_search_index(&batch)
            .await
            .inspect_err(record_failure)?;
        Ok(batch)
    }

    async fn delete_from_search_index(&self, batch: &BatchIdResponse) -> Result<(), PurgeError> {
        let search = self.search(Stage::OpenSearch)?;
        let session_ids = self.batch_session_ids(Stage::OpenSearch, batch).await?;
        let index = &self.settings.sessions_index;

        if batch.dry_run {
            info!(
                index = %index,
                sessions = session_ids.len(),
                "DRY RUN: Would delete session documents from search index"
            );
            return Ok(());
        }

        for id in &session_ids {
            search.delete(index, *id).await.map_err(|e| {
                PurgeError::write(Stage::OpenSearch, "error deleting session document", e)
            })?;
        }

        metrics::record_purge_deletion(Stage::OpenSearch.as_str(), session_ids.len() as u64);
        info!(
            index = %index,
            sessions = session_ids.len(),
            "Deleted session documents from search index"
        );
        Ok(())
    }
}

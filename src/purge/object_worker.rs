use tracing::{debug, info, instrument};

use super::{PurgeError, PurgeHandlers, Stage, handlers::record_failure};
use crate::{models::BatchIdResponse, observability::metrics, storage::session_prefix};

impl PurgeHandlers {
    /// Delete every stored payload object of a batch's sessions.
    ///
    /// Object keys are not recorded anywhere, so each session's prefix is
    /// listed and every listed key deleted. A session with no objects is
    /// skipped. The first listing or delete failure abandons the batch.
    #[instrument(
        skip(self, batch),
        fields(
            task_id = %batch.task_id,
            batch_id = %batch.batch_id,
            project_id = batch.project_id,
            dry_run = batch.dry_run
        )
    )]
    pub async fn delete_session_batch_from_s3(
        &self,
        batch: BatchIdResponse,
    ) -> Result<BatchIdResponse, PurgeError> {
        self.delete_from_object_storage(&batch)
            .await
            .inspect_err(record_failure)?;
        Ok(batch)
    }

    async fn delete_from_object_storage(&self, batch: &BatchIdResponse) -> Result<(), PurgeError> {
        let objects = self.objects(Stage::ObjectStorage)?;
        let session_ids = self.batch_session_ids(Stage::ObjectStorage, batch).await?;

        let mut listed = 0usize;
        let mut deleted = 0u64;
        let mut bytes = 0i64;

        for session_id in &session_ids {
            let prefix =
                session_prefix(&self.settings.environment_prefix, batch.project_id, *session_id);
            let listing = objects.list(&prefix).await.map_err(|e| {
                PurgeError::read(Stage::ObjectStorage, "error listing objects", e)
            })?;
            listed += listing.len();
            let prefix_bytes: i64 = listing.iter().map(|o| o.size).sum();
            bytes += prefix_bytes;

            if batch.dry_run {
                if !listing.is_empty() {
                    info!(
                        prefix = %prefix,
                        objects = listing.len(),
                        bytes = prefix_bytes,
                        "DRY RUN: Would delete session objects"
                    );
                }
                continue;
            }

            for object in &listing {
                objects.delete(&object.key).await.map_err(|e| {
                    PurgeError::write(Stage::ObjectStorage, "error deleting object", e)
                })?;
                deleted += 1;
            }
            debug!(
                prefix = %prefix,
                objects = listing.len(),
                bytes = prefix_bytes,
                "Deleted session objects"
            );
        }

        if !batch.dry_run {
            metrics::record_purge_deletion(Stage::ObjectStorage.as_str(), deleted);
        }
        info!(
            backend = objects.backend_name(),
            sessions = session_ids.len(),
            objects_listed = listed,
            objects_deleted = deleted,
            bytes_listed = bytes,
            "Object storage purge complete"
        );
        Ok(())
    }
}

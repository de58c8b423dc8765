//! Turns a deletion request into batch manifests.
//!
//! The search index caps one response at a page of ids, so the query is
//! walked with a `search_after` cursor over ids sorted ascending. Every
//! non-empty page becomes one batch; the first empty page ends the walk.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{PurgeError, PurgeHandlers, Stage, handlers::record_failure};
use crate::{
    config::MAX_SEARCH_PAGE_SIZE,
    models::{BatchIdResponse, DeletionRequest, NewBatchManifest},
    observability::metrics,
    search::SearchOptions,
};

impl PurgeHandlers {
    /// Resolve `request` into persisted batch manifests and return their handles.
    ///
    /// The handles share one task id. A search failure aborts the walk;
    /// batches persisted before it remain valid and may be deleted later.
    #[instrument(
        skip(self, request),
        fields(
            project_id = request.project_id,
            dry_run = request.dry_run,
            task_id = tracing::field::Empty
        )
    )]
    pub async fn get_session_ids_by_query(
        &self,
        request: &DeletionRequest,
    ) -> Result<Vec<BatchIdResponse>, PurgeError> {
        self.enumerate(request).await.inspect_err(record_failure)
    }

    async fn enumerate(&self, request: &DeletionRequest) -> Result<Vec<BatchIdResponse>, PurgeError> {
        let page_size = self.settings.page_size;
        if page_size == 0 || page_size > MAX_SEARCH_PAGE_SIZE {
            return Err(PurgeError::InvalidPageSize { page_size });
        }
        let search = self.search(Stage::Enumerate)?;
        let manifests = self.db(Stage::Enumerate)?.manifests();

        let task_id = Uuid::new_v4();
        tracing::Span::current().record("task_id", tracing::field::display(task_id));

        let mut batches = Vec::new();
        let mut cursor: Option<i64> = None;
        let mut total = 0usize;

        loop {
            let options = SearchOptions::session_ids(page_size, cursor);
            let session_ids = search
                .search_session_ids(request.project_id, &request.query, &options)
                .await
                .map_err(|e| PurgeError::read(Stage::Enumerate, "error searching sessions", e))?;

            let Some(&last) = session_ids.iter().max() else {
                break;
            };

            let manifest = NewBatchManifest {
                task_id,
                batch_id: Uuid::new_v4(),
                project_id: request.project_id,
                dry_run: request.dry_run,
                session_ids,
            };
            manifests.insert_batch(&manifest).await.map_err(|e| {
                PurgeError::write(Stage::Enumerate, "error saving batch manifest", e)
            })?;

            let count = manifest.session_ids.len();
            metrics::record_batch_created(count);
            debug!(
                batch_id = %manifest.batch_id,
                sessions = count,
                cursor = last,
                "Batch manifest saved"
            );

            total += count;
            batches.push(manifest.handle());
            cursor = Some(last);
        }

        info!(
            %task_id,
            batches = batches.len(),
            sessions = total,
            "Enumeration complete"
        );
        Ok(batches)
    }
}

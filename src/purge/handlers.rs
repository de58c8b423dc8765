use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{PurgeError, SetupError, Stage, error_chain};
use crate::{
    config::{MAX_SEARCH_PAGE_SIZE, PurgeConfig},
    db::DbPool,
    email::{EmailSender, SendGridClient},
    models::BatchIdResponse,
    observability::metrics,
    search::{OpenSearchClient, SearchIndex},
    storage::{ObjectStore, create_object_store},
};

/// Stage parameters that do not belong to a single collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeSettings {
    /// Index the session documents are deleted from.
    pub sessions_index: String,
    /// Session ids per search page, and so per batch.
    pub page_size: usize,
    /// Prepended to every object key prefix ("" or e.g. "dev/").
    pub environment_prefix: String,
    pub from_address: String,
    pub from_name: String,
    pub sessions_deleted_template_id: String,
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            sessions_index: "sessions".to_string(),
            page_size: MAX_SEARCH_PAGE_SIZE,
            environment_prefix: String::new(),
            from_address: String::new(),
            from_name: "Notifications".to_string(),
            sessions_deleted_template_id: String::new(),
        }
    }
}

impl PurgeSettings {
    pub fn from_config(config: &PurgeConfig) -> Self {
        let mut settings = Self::default();
        if let Some(search) = &config.search {
            settings.sessions_index = search.sessions_index.clone();
            settings.page_size = search.page_size;
        }
        if let Some(storage) = &config.storage {
            settings.environment_prefix = storage.environment_prefix.clone();
        }
        if let Some(email) = &config.email {
            settings.from_address = email.from_address.clone();
            settings.from_name = email.from_name.clone();
            settings.sessions_deleted_template_id = email.sessions_deleted_template_id.clone();
        }
        settings
    }
}

/// Entry points for every pipeline stage.
///
/// Each entry point is stateless with respect to the others and may run
/// concurrently with any other call on a different batch. Collaborators are
/// injected once at construction. Dropping a returned future cancels the
/// stage; deletes already issued stay issued.
pub struct PurgeHandlers {
    pub(super) db: Option<Arc<DbPool>>,
    pub(super) search: Option<Arc<dyn SearchIndex>>,
    pub(super) objects: Option<Arc<dyn ObjectStore>>,
    pub(super) email: Option<Arc<dyn EmailSender>>,
    pub(super) settings: PurgeSettings,
}

impl PurgeHandlers {
    pub fn new(
        db: Arc<DbPool>,
        search: Arc<dyn SearchIndex>,
        objects: Arc<dyn ObjectStore>,
        email: Arc<dyn EmailSender>,
        settings: PurgeSettings,
    ) -> Self {
        Self {
            db: Some(db),
            search: Some(search),
            objects: Some(objects),
            email: Some(email),
            settings,
        }
    }

    /// Build every collaborator that has a configuration section.
    pub async fn from_config(config: &PurgeConfig) -> Result<Self, SetupError> {
        let db = if config.database.is_none() {
            None
        } else {
            Some(Arc::new(DbPool::from_config(&config.database).await?))
        };

        let search: Option<Arc<dyn SearchIndex>> = match &config.search {
            Some(search) => Some(Arc::new(OpenSearchClient::new(search)?)),
            None => None,
        };

        let objects = match &config.storage {
            Some(storage) => Some(create_object_store(storage).await?),
            None => None,
        };

        let email: Option<Arc<dyn EmailSender>> = match &config.email {
            Some(email) => Some(Arc::new(SendGridClient::new(email)?)),
            None => None,
        };

        info!(
            database = db.is_some(),
            search = search.is_some(),
            storage = objects.is_some(),
            email = email.is_some(),
            "Purge handlers initialized"
        );

        Ok(Self {
            db,
            search,
            objects,
            email,
            settings: PurgeSettings::from_config(config),
        })
    }

    pub(super) fn db(&self, stage: Stage) -> Result<&DbPool, PurgeError> {
        self.db.as_deref().ok_or(PurgeError::NotConfigured {
            stage,
            collaborator: "database",
        })
    }

    pub(super) fn search(&self, stage: Stage) -> Result<&dyn SearchIndex, PurgeError> {
        self.search.as_deref().ok_or(PurgeError::NotConfigured {
            stage,
            collaborator: "search index",
        })
    }

    pub(super) fn objects(&self, stage: Stage) -> Result<&dyn ObjectStore, PurgeError> {
        self.objects.as_deref().ok_or(PurgeError::NotConfigured {
            stage,
            collaborator: "object storage",
        })
    }

    pub(super) fn email(&self) -> Result<&dyn EmailSender, PurgeError> {
        self.email.as_deref().ok_or(PurgeError::NotConfigured {
            stage: Stage::Notify,
            collaborator: "email",
        })
    }

    /// Session ids of a batch, read from the manifest store.
    pub(super) async fn batch_session_ids(
        &self,
        stage: Stage,
        batch: &BatchIdResponse,
    ) -> Result<Vec<i64>, PurgeError> {
        self.db(stage)?
            .manifests()
            .session_ids_in_batch(batch.task_id, batch.batch_id)
            .await
            .map_err(|e| PurgeError::read(stage, "error reading batch manifest", e))
    }

    /// Number of sessions recorded for a task, for the completion notice.
    pub async fn task_session_count(&self, task_id: Uuid) -> Result<u64, PurgeError> {
        self.db(Stage::Notify)?
            .manifests()
            .count_sessions_in_task(task_id)
            .await
            .map_err(|e| PurgeError::read(Stage::Notify, "error counting task sessions", e))
    }

    /// Handles of every batch written for a task, for re-driving workers.
    pub async fn batches_for_task(&self, task_id: Uuid) -> Result<Vec<BatchIdResponse>, PurgeError> {
        self.db(Stage::Enumerate)?
            .manifests()
            .list_batches(task_id)
            .await
            .map_err(|e| PurgeError::read(Stage::Enumerate, "error listing task batches", e))
    }
}

/// Log and count a failed stage.
pub(super) fn record_failure(err: &PurgeError) {
    tracing::error!(stage = %err.stage(), error = %error_chain(err), "Purge stage failed");
    metrics::record_purge_error(err.stage().as_str());
}

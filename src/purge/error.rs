use thiserror::Error;

use crate::{config::MAX_SEARCH_PAGE_SIZE, db::DbError, email::EmailError, search::SearchError, storage::StorageError};

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Enumerate,
    OpenSearch,
    Database,
    ObjectStorage,
    Notify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Enumerate => "enumerate",
            Stage::OpenSearch => "opensearch",
            Stage::Database => "database",
            Stage::ObjectStorage => "object_storage",
            Stage::Notify => "notify",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by one of the stores the pipeline reads or mutates.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error returned by a stage entry point.
///
/// Nothing is retried internally. Deletes already issued before a failure
/// are not rolled back; every delete is idempotent, so the orchestration
/// layer re-runs the whole batch.
#[derive(Debug, Error)]
pub enum PurgeError {
    /// A search, listing or manifest read failed. The stage produced no result.
    #[error("{stage}: {context}")]
    UpstreamRead {
        stage: Stage,
        context: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// A delete or manifest insert failed. The current batch was abandoned.
    #[error("{stage}: {context}")]
    UpstreamWrite {
        stage: Stage,
        context: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// The email collaborator rejected the notification.
    #[error("notify: error sending email")]
    Notification(#[source] EmailError),

    /// A page size outside what the search index serves. A page of zero
    /// would end the walk before any batch is written.
    #[error(
        "enumerate: page size {page_size} is outside 1..={max}",
        max = MAX_SEARCH_PAGE_SIZE
    )]
    InvalidPageSize { page_size: usize },

    /// The stage needs a collaborator that has no configuration section.
    #[error("{stage}: {collaborator} is not configured")]
    NotConfigured {
        stage: Stage,
        collaborator: &'static str,
    },
}

impl PurgeError {
    pub(crate) fn read(stage: Stage, context: &'static str, source: impl Into<UpstreamError>) -> Self {
        PurgeError::UpstreamRead {
            stage,
            context,
            source: source.into(),
        }
    }

    pub(crate) fn write(
        stage: Stage,
        context: &'static str,
        source: impl Into<UpstreamError>,
    ) -> Self {
        PurgeError::UpstreamWrite {
            stage,
            context,
            source: source.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PurgeError::UpstreamRead { stage, .. }
            | PurgeError::UpstreamWrite { stage, .. }
            | PurgeError::NotConfigured { stage, .. } => *stage,
            PurgeError::Notification(_) => Stage::Notify,
            PurgeError::InvalidPageSize { .. } => Stage::Enumerate,
        }
    }

    /// Whether the failure happened before anything was mutated by this call.
    pub fn is_read(&self) -> bool {
        matches!(self, PurgeError::UpstreamRead { .. })
    }
}

/// `err` followed by each error in its source chain, joined with ": ".
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Errors building [`PurgeHandlers`](super::PurgeHandlers) from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to open database")]
    Database(#[from] DbError),

    #[error("Failed to create search client")]
    Search(#[from] SearchError),

    #[error("Failed to create object store")]
    Storage(#[from] StorageError),

    #[error("Failed to create email client")]
    Email(#[from] EmailError),
}

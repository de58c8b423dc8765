//! Search index adapter.
//!
//! The index holds one document per session, keyed by the numeric session id,
//! with at least `id` and `project_id` fields. The enumerator pages through it
//! with `search_after`; the index worker deletes documents by id.

mod opensearch;

use async_trait::async_trait;
pub use opensearch::OpenSearchClient;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Search index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode search response: {0}")]
    Decode(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Paging and projection options for one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Page size.
    pub max_results: usize,
    pub sort_field: String,
    pub sort_order: SortOrder,
    /// Sort value of the last hit of the previous page; `None` for the first page.
    pub search_after: Option<i64>,
    /// `_source` fields to return.
    pub include_fields: Vec<String>,
}

impl SearchOptions {
    /// Options for walking session ids in ascending order.
    pub fn session_ids(max_results: usize, search_after: Option<i64>) -> Self {
        Self {
            max_results,
            sort_field: "id".to_string(),
            sort_order: SortOrder::Asc,
            search_after,
            include_fields: vec!["id".to_string()],
        }
    }
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Session ids of `project_id` matching `query`, one page at a time.
    ///
    /// An empty `query` matches every session of the project.
    async fn search_session_ids(
        &self,
        project_id: i64,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<Vec<i64>>;

    /// Delete one document. Deleting a missing document succeeds.
    async fn delete(&self, index: &str, id: i64) -> SearchResult<()>;
}

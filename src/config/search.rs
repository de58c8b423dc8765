use serde::{Deserialize, Serialize};

/// Largest page OpenSearch returns for a single query (`index.max_result_window`).
pub const MAX_SEARCH_PAGE_SIZE: usize = 10_000;

/// Search index (OpenSearch) configuration.
///
/// # Example
///
/// ```toml
/// [search]
/// url = "https://opensearch.internal:9200"
/// username = "purge"
/// password = "${OPENSEARCH_PASSWORD}"
/// sessions_index = "sessions"
/// page_size = 10000
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Base URL of the OpenSearch cluster.
    pub url: String,

    /// Basic auth username.
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password.
    #[serde(default)]
    pub password: Option<String>,

    /// Index holding one document per session, keyed by session id.
    #[serde(default = "default_sessions_index")]
    pub sessions_index: String,

    /// Number of session ids requested per search page; each non-empty page
    /// becomes one batch.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("sessions_index", &self.sessions_index)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = url::Url::parse(&self.url) {
            return Err(format!("search.url '{}' is not a valid URL: {}", self.url, e));
        }
        if self.sessions_index.is_empty() {
            return Err("search.sessions_index cannot be empty".to_string());
        }
        if self.page_size == 0 || self.page_size > MAX_SEARCH_PAGE_SIZE {
            return Err(format!(
                "search.page_size must be between 1 and {MAX_SEARCH_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err("search.password requires search.username".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

fn default_sessions_index() -> String {
    "sessions".to_string()
}

fn default_page_size() -> usize {
    MAX_SEARCH_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

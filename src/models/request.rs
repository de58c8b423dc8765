use serde::{Deserialize, Serialize};

/// A caller's request to purge every session matching a search query.
///
/// This is the input of the enumeration stage. It is not persisted; the
/// manifest rows written during enumeration are the durable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    /// Project whose sessions are searched.
    pub project_id: i64,
    /// OpenSearch query DSL (a JSON object, as a string) selecting the sessions.
    pub query: String,
    /// Exercise every read path without deleting anything.
    #[serde(default)]
    pub dry_run: bool,
    /// Requester address for the completion notice.
    #[serde(default)]
    pub email: String,
    /// Requester display name used in the completion notice.
    #[serde(default)]
    pub first_name: String,
}

impl DeletionRequest {
    /// Build the completion notice for this request once `session_count`
    /// sessions have been purged.
    pub fn notification(&self, session_count: u64) -> NotificationInput {
        NotificationInput {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            session_count,
        }
    }
}

/// Input of the notification stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInput {
    /// Recipient address.
    pub email: String,
    /// Recipient display name.
    pub first_name: String,
    /// Number of sessions deleted for the request.
    pub session_count: u64,
}

//! Deferred session purge across the search index, the database and object
//! storage.
//!
//! The pipeline runs as independent stages, each invoked by an external
//! orchestrator:
//!
//! 1. [`PurgeHandlers::get_session_ids_by_query`] walks the search results
//!    and persists one batch manifest per page.
//! 2. [`PurgeHandlers::delete_session_batch_from_opensearch`],
//!    [`PurgeHandlers::delete_session_batch_from_database`] and
//!    [`PurgeHandlers::delete_session_batch_from_s3`] each take a batch handle,
//!    re-read its session ids from the manifest store and delete from one store.
//!    They may run in any order, concurrently, and any number of times.
//! 3. [`PurgeHandlers::send_email`] notifies the requester.
//!
//! Manifests are never updated or removed; they are the audit trail of what
//! was purged.

mod database_worker;
mod enumerator;
mod error;
mod handlers;
mod notifier;
mod object_worker;
mod search_worker;
#[cfg(all(test, feature = "database-sqlite"))]
mod test_support;

pub use error::{PurgeError, SetupError, Stage, UpstreamError, error_chain};
pub use handlers::{PurgeHandlers, PurgeSettings};

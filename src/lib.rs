//! Deferred, auditable deletion of recorded sessions.
//!
//! A deletion request is resolved into batch manifests persisted in the
//! database; each batch is later purged from the search index, the session
//! tables and object storage by independent, re-runnable workers. See
//! [`purge`] for the stage entry points.

pub mod config;
pub mod db;
pub mod email;
pub mod models;
pub mod observability;
pub mod purge;
pub mod search;
pub mod storage;

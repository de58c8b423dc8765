//! Object storage adapter for session payloads.
//!
//! Payloads of one session are stored under
//! `{environment_prefix}{project_id}/{session_id}/`, split across any number
//! of keys that are only discoverable by listing the prefix.

#[cfg(feature = "s3-storage")]
mod s3;

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(feature = "s3-storage")]
pub use s3::S3ObjectStore;
use thiserror::Error;

use crate::config::ObjectStorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to list objects under '{prefix}': {message}")]
    List { prefix: String, message: String },

    #[error("Failed to delete object '{key}': {message}")]
    Delete { key: String, message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: i64,
}

/// A bucket of objects addressed by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every object whose key starts with `prefix`, across all listing pages.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>>;

    /// Delete one object. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Name of the backend, for logs.
    fn backend_name(&self) -> &'static str;
}

/// Key prefix holding every payload object of one session.
///
/// The trailing slash keeps session 12 from matching session 123.
pub fn session_prefix(environment_prefix: &str, project_id: i64, session_id: i64) -> String {
    format!("{environment_prefix}{project_id}/{session_id}/")
}

/// Create the object store described by `config`.
pub async fn create_object_store(
    config: &ObjectStorageConfig,
) -> StorageResult<Arc<dyn ObjectStore>> {
    config.validate().map_err(StorageError::Config)?;

    #[cfg(feature = "s3-storage")]
    {
        tracing::info!(bucket = %config.bucket, "Using S3 object storage");
        Ok(Arc::new(S3ObjectStore::new(config.clone()).await))
    }
    #[cfg(not(feature = "s3-storage"))]
    {
        Err(StorageError::Config(
            "Object storage requires the 's3-storage' feature. \
                Rebuild with: cargo build --features s3-storage"
                .to_string(),
        ))
    }
}

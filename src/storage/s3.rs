//! S3-compatible implementation of [`ObjectStore`].

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use super::{ObjectInfo, ObjectStore, StorageError, StorageResult};
use crate::config::ObjectStorageConfig;

/// Supports AWS S3, MinIO, Cloudflare R2 and other S3-compatible services.
pub struct S3ObjectStore {
    config: ObjectStorageConfig,
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub async fn new(config: ObjectStorageConfig) -> Self {
        info!(bucket = %config.bucket, "Initializing S3 object storage");

        let mut sdk_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            sdk_config_builder = sdk_config_builder.region(aws_config::Region::new(region.clone()));
        }

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = aws_credential_types::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None, // session token
                None, // expiry
                "session-purge-config",
            );
            sdk_config_builder = sdk_config_builder.credentials_provider(credentials);
        }

        let sdk_config = sdk_config_builder.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(s3_config_builder.build());

        Self { config, client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.config.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to list S3 objects");
                    StorageError::List {
                        prefix: prefix.to_string(),
                        message: e.to_string(),
                    }
                })?;

            objects.extend(resp.contents().iter().filter_map(|object| {
                object.key().map(|key| ObjectInfo {
                    key: key.to_string(),
                    size: object.size().unwrap_or_default(),
                })
            }));

            match resp.next_continuation_token() {
                Some(token) if resp.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!(prefix, count = objects.len(), "Listed S3 objects");
        Ok(objects)
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete from S3");
                StorageError::Delete {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })?;

        debug!(key, "Deleted S3 object");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

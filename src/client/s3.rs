// File: ./src/client/s3.rs
use crate::client::BlobStore;
use crate::config::StorageConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;

/// Run-state persistence in an S3 bucket (or any S3-compatible endpoint).
#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            // Self-hosted stores (MinIO and friends) need path-style addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn download_to(&self, key: &str, path: &Path) -> Result<bool> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    log::info!("No '{}' in bucket '{}' yet", key, self.bucket);
                    return Ok(false);
                }
                return Err(anyhow!("Failed to download '{}': {}", key, e));
            }
        };

        let bytes = response
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read '{}'", key))?
            .into_bytes();
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }

    async fn upload_from(&self, key: &str, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to upload '{}': {}", key, e))?;
        log::info!("Uploaded '{}' to bucket '{}'", key, self.bucket);
        Ok(())
    }
}

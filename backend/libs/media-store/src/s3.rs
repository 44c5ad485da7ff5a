/// S3-backed media store
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::sync::Arc;

use crate::{MediaConfig, MediaError, MediaStore, Result, StoredMedia};

#[derive(Clone)]
pub struct S3MediaStore {
    client: Arc<Client>,
    config: MediaConfig,
}

impl S3MediaStore {
    /// Build a client from the ambient AWS credential chain
    pub async fn connect(config: MediaConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Arc::new(Client::from_conf(builder.build())),
            config,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<StoredMedia> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| MediaError::Backend(e.to_string()))?;

        tracing::debug!(%key, size, "uploaded object to S3");

        Ok(StoredMedia {
            key: key.to_string(),
            url: self.config.public_url(key),
            size,
        })
    }

    async fn delete_url(&self, url: &str) -> Result<()> {
        let key = self
            .config
            .key_from_url(url)
            .ok_or_else(|| MediaError::ForeignUrl(url.to_string()))?;

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MediaError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| MediaError::Backend(e.to_string()))?;

        Ok(())
    }
}

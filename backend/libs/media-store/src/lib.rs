/// Media storage for Vidy services
///
/// Uploaded videos, thumbnails, avatars and cover images are written through
/// the [`MediaStore`] trait. Production deployments use S3 (or an
/// S3-compatible store); development and tests use a local directory.
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod config;
pub mod local;
pub mod s3;

pub use config::{MediaBackend, MediaConfig};
pub use local::LocalMediaStore;
pub use s3::S3MediaStore;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media backend error: {0}")]
    Backend(String),

    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("url is not managed by this store: {0}")]
    ForeignUrl(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;

/// A successfully stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub key: String,
    pub url: String,
    pub size: usize,
}

/// Logical folder an upload lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
    Avatar,
    CoverImage,
}

impl MediaKind {
    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::Thumbnail => "thumbnails",
            MediaKind::Avatar => "avatars",
            MediaKind::CoverImage => "covers",
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `body` under `key` and return its public location
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<StoredMedia>;

    /// Remove a previously stored object by its public URL
    async fn delete_url(&self, url: &str) -> Result<()>;

    /// Cheap connectivity probe used by readiness checks
    async fn health_check(&self) -> Result<()>;
}

/// Build a unique object key: `<folder>/<uuid>.<ext>`
///
/// The extension is taken from the client filename when it looks sane,
/// otherwise it is dropped.
pub fn object_key(kind: MediaKind, filename: Option<&str>) -> String {
    let ext = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}/{}.{}", kind.folder(), Uuid::new_v4(), ext),
        None => format!("{}/{}", kind.folder(), Uuid::new_v4()),
    }
}

/// Upload helper that generates the object key
pub async fn upload(
    store: &dyn MediaStore,
    kind: MediaKind,
    filename: Option<&str>,
    body: Vec<u8>,
    content_type: &str,
) -> Result<StoredMedia> {
    let key = object_key(kind, filename);
    store.put(&key, body, content_type).await
}

/// Construct the configured backend
pub async fn connect(config: MediaConfig) -> Result<Arc<dyn MediaStore>> {
    match config.backend {
        MediaBackend::S3 => {
            tracing::info!(bucket = %config.bucket, "using S3 media store");
            Ok(Arc::new(S3MediaStore::connect(config).await))
        }
        MediaBackend::Local => {
            tracing::info!(dir = %config.local_dir.display(), "using local media store");
            Ok(Arc::new(LocalMediaStore::new(config).await?))
        }
    }
}

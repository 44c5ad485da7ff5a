/// Filesystem-backed media store for development and tests
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::{MediaConfig, MediaError, MediaStore, Result, StoredMedia};

#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    config: MediaConfig,
}

impl LocalMediaStore {
    pub async fn new(config: MediaConfig) -> Result<Self> {
        fs::create_dir_all(&config.local_dir).await?;
        Ok(Self {
            root: config.local_dir.clone(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(MediaError::ForeignUrl(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<StoredMedia> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = body.len();
        fs::write(&path, body).await?;

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
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<()> {
        fs::metadata(&self.root).await?;
        Ok(())
    }
}

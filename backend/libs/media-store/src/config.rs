/// Media storage configuration shared by every uploader
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which storage backend receives uploaded media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    /// S3 or any S3-compatible object store (MinIO, R2, ...)
    S3,
    /// Plain directory on the local filesystem
    Local,
}

impl std::str::FromStr for MediaBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(MediaBackend::S3),
            "local" | "fs" => Ok(MediaBackend::Local),
            other => Err(format!("unknown media backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint for S3-compatible stores
    pub endpoint: Option<String>,
    /// Public base URL media is served from (CDN domain or static file host)
    pub base_url: String,
    /// Whether to use path-style addressing
    pub path_style: bool,
    /// Root directory for the local backend
    pub local_dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            backend: MediaBackend::Local,
            bucket: "vidy-media".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            base_url: "http://localhost:8000/media".to_string(),
            path_style: false,
            local_dir: PathBuf::from("./public/media"),
        }
    }
}

impl MediaConfig {
    /// Load media configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let backend = match std::env::var("MEDIA_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            backend,
            bucket: std::env::var("S3_BUCKET").unwrap_or(defaults.bucket),
            region: std::env::var("AWS_REGION").unwrap_or(defaults.region),
            endpoint: std::env::var("S3_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            base_url: std::env::var("MEDIA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            path_style: std::env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.path_style),
            local_dir: std::env::var("MEDIA_LOCAL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_dir),
        })
    }

    /// Public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Inverse of [`public_url`](Self::public_url). Returns `None` for URLs
    /// that were not produced by this store.
    pub fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.base_url.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> MediaConfig {
        MediaConfig {
            base_url: base_url.to_string(),
            ..MediaConfig::default()
        }
    }

    #[test]
    fn test_public_url_joins_without_double_slash() {
        let cfg = config("https://cdn.vidy.dev/");
        assert_eq!(
            cfg.public_url("videos/abc.mp4"),
            "https://cdn.vidy.dev/videos/abc.mp4"
        );
    }

    #[test]
    fn test_key_from_url_round_trips_own_urls() {
        let cfg = config("https://cdn.vidy.dev");
        let url = cfg.public_url("avatars/x.png");
        assert_eq!(cfg.key_from_url(&url), Some("avatars/x.png"));
    }

    #[test]
    fn test_key_from_url_rejects_foreign_urls() {
        let cfg = config("https://cdn.vidy.dev");
        assert_eq!(cfg.key_from_url("https://elsewhere.com/avatars/x.png"), None);
        assert_eq!(cfg.key_from_url("https://cdn.vidy.dev/"), None);
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("S3".parse::<MediaBackend>(), Ok(MediaBackend::S3));
        assert_eq!("fs".parse::<MediaBackend>(), Ok(MediaBackend::Local));
        assert!("ftp".parse::<MediaBackend>().is_err());
    }
}

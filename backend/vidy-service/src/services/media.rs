/// Upload plumbing between multipart handlers and the media store
use crate::error::{AppError, Result};
use crate::metrics::MEDIA_UPLOADS_TOTAL;
use media_store::{MediaKind, MediaStore};

/// A file part read from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => "video",
        MediaKind::Thumbnail => "thumbnail",
        MediaKind::Avatar => "avatar",
        MediaKind::CoverImage => "cover_image",
    }
}

/// Reject empty files and files whose declared type does not fit `kind`
pub fn check_upload(kind: MediaKind, file: &UploadedFile) -> Result<()> {
    if file.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Uploaded {} is empty",
            kind_label(kind)
        )));
    }

    let expected = match kind {
        MediaKind::Video => "video/",
        MediaKind::Thumbnail | MediaKind::Avatar | MediaKind::CoverImage => "image/",
    };
    if !file.content_type.starts_with(expected) {
        return Err(AppError::BadRequest(format!(
            "Uploaded {} must be of type {}*",
            kind_label(kind),
            expected
        )));
    }
    Ok(())
}

/// Validate and store one upload; returns its public URL
pub async fn store_upload(
    store: &dyn MediaStore,
    kind: MediaKind,
    file: UploadedFile,
) -> Result<String> {
    check_upload(kind, &file)?;

    let size = file.len();
    match media_store::upload(
        store,
        kind,
        file.filename.as_deref(),
        file.bytes,
        &file.content_type,
    )
    .await
    {
        Ok(stored) => {
            MEDIA_UPLOADS_TOTAL
                .with_label_values(&[kind_label(kind), "ok"])
                .inc();
            tracing::info!(kind = kind_label(kind), key = %stored.key, size, "media stored");
            Ok(stored.url)
        }
        Err(err) => {
            MEDIA_UPLOADS_TOTAL
                .with_label_values(&[kind_label(kind), "error"])
                .inc();
            Err(err.into())
        }
    }
}

/// Remove a replaced or orphaned object; failures are logged only
pub async fn discard(store: &dyn MediaStore, url: &str) {
    if let Err(err) = store.delete_url(url).await {
        tracing::warn!(%url, error = %err, "failed to delete media object");
    }
}

/// Pass `result` through, first deleting the freshly stored `url` when the
/// write it was meant for failed
pub async fn discard_on_error<T>(
    store: &dyn MediaStore,
    url: Option<&str>,
    result: Result<T>,
) -> Result<T> {
    if result.is_err() {
        if let Some(url) = url {
            discard(store, url).await;
        }
    }
    result
}

/// Video service - upload, metadata changes, deletion and watch tracking
use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::middleware::ensure_owner;
use crate::models::{NewVideo, Video, VideoChanges, VideoView};
use crate::services::media::{check_upload, discard, discard_on_error, store_upload, UploadedFile};
use crate::AppState;
use media_store::{MediaKind, MediaStore};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct VideoService {
    pool: PgPool,
    media: Arc<dyn MediaStore>,
}

impl VideoService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            media: state.media.clone(),
        }
    }

    /// Store both files and create a published video
    pub async fn publish(
        &self,
        owner_id: Uuid,
        video: NewVideo,
        video_file: Option<UploadedFile>,
        thumbnail: Option<UploadedFile>,
    ) -> Result<Video> {
        video.validate()?;
        let video_file =
            video_file.ok_or_else(|| AppError::BadRequest("Video file is required".into()))?;
        let thumbnail =
            thumbnail.ok_or_else(|| AppError::BadRequest("Thumbnail is required".into()))?;
        if !video.duration.is_finite() || video.duration < 0.0 {
            return Err(AppError::BadRequest("Duration must be a positive number".into()));
        }

        // fail fast before anything is written
        check_upload(MediaKind::Video, &video_file)?;
        check_upload(MediaKind::Thumbnail, &thumbnail)?;

        let video_url = store_upload(self.media.as_ref(), MediaKind::Video, video_file).await?;
        let thumbnail_url =
            match store_upload(self.media.as_ref(), MediaKind::Thumbnail, thumbnail).await {
                Ok(url) => url,
                Err(err) => {
                    discard(self.media.as_ref(), &video_url).await;
                    return Err(err);
                }
            };

        match video_repo::create_video(&self.pool, owner_id, &video, &video_url, &thumbnail_url)
            .await
        {
            Ok(created) => {
                tracing::info!(video_id = %created.id, %owner_id, "video published");
                Ok(created)
            }
            Err(err) => {
                discard(self.media.as_ref(), &video_url).await;
                discard(self.media.as_ref(), &thumbnail_url).await;
                Err(err.into())
            }
        }
    }

    /// Load a video for playback: bumps views and the viewer's history
    pub async fn watch(&self, video_id: Uuid, viewer: Uuid) -> Result<VideoView> {
        let row = video_repo::find_view(&self.pool, video_id, viewer)
            .await?
            .filter(|row| row.is_published || row.owner_id == viewer)
            .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

        video_repo::increment_views(&self.pool, video_id).await?;
        video_repo::record_watch(&self.pool, viewer, video_id).await?;

        let mut view = VideoView::from(row);
        view.views += 1;
        Ok(view)
    }

    /// Owned video or 404/403
    pub async fn owned(&self, video_id: Uuid, user_id: Uuid) -> Result<Video> {
        let video = video_repo::find_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
        ensure_owner(video.owner_id, user_id, "video")?;
        Ok(video)
    }

    pub async fn update(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        mut changes: VideoChanges,
        thumbnail: Option<UploadedFile>,
    ) -> Result<Video> {
        changes.validate()?;
        let existing = self.owned(video_id, user_id).await?;

        if let Some(file) = thumbnail {
            changes.thumbnail =
                Some(store_upload(self.media.as_ref(), MediaKind::Thumbnail, file).await?);
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let result = video_repo::update_video(&self.pool, video_id, &changes)
            .await
            .map_err(AppError::from)
            .and_then(|row| row.ok_or_else(|| AppError::NotFound("Video not found".into())));
        let updated =
            discard_on_error(self.media.as_ref(), changes.thumbnail.as_deref(), result).await?;

        if changes.thumbnail.is_some() {
            discard(self.media.as_ref(), &existing.thumbnail).await;
        }
        tracing::info!(%video_id, %user_id, "video updated");
        Ok(updated)
    }

    pub async fn delete(&self, video_id: Uuid, user_id: Uuid) -> Result<Video> {
        self.owned(video_id, user_id).await?;

        let deleted = video_repo::delete_video(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

        discard(self.media.as_ref(), &deleted.video_file).await;
        discard(self.media.as_ref(), &deleted.thumbnail).await;
        tracing::info!(%video_id, %user_id, "video deleted");
        Ok(deleted)
    }

    pub async fn toggle_publish(&self, video_id: Uuid, user_id: Uuid) -> Result<Video> {
        self.owned(video_id, user_id).await?;

        let video = video_repo::toggle_publish(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
        tracing::info!(%video_id, published = video.is_published, "video publish state toggled");
        Ok(video)
    }
}

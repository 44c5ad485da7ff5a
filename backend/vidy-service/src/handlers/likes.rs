/// Like handlers - toggles on videos, comments and tweets
use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::db::{like_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{LikeTarget, LikeToggle, VideoView};
use crate::response::ApiResponse;
use crate::AppState;

async fn toggle(state: &AppState, target: LikeTarget, user_id: UserId) -> Result<HttpResponse> {
    if !like_repo::target_visible(&state.db, target, user_id.0).await? {
        return Err(AppError::NotFound(format!("{} not found", target.label())));
    }

    let liked = like_repo::toggle_like(&state.db, target, user_id.0).await?;
    tracing::debug!(target_id = %target.id(), kind = target.label(), liked, user_id = %user_id.0, "like toggled");

    let message = format!(
        "{} {}",
        target.label(),
        if liked { "liked" } else { "unliked" }
    );
    Ok(ApiResponse::ok(LikeToggle { liked }, message))
}

#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/v/{videoId}",
    tag = "likes",
    params(("videoId" = String, Path, description = "Video UUID")),
    responses(
        (status = 200, description = "New like state", body = LikeToggle),
        (status = 404, description = "Video not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_video_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::Video(parse_id(&path, "video")?);
    toggle(&state, target, user_id).await
}

pub async fn toggle_comment_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::Comment(parse_id(&path, "comment")?);
    toggle(&state, target, user_id).await
}

pub async fn toggle_tweet_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::Tweet(parse_id(&path, "tweet")?);
    toggle(&state, target, user_id).await
}

pub async fn liked_videos(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let videos: Vec<VideoView> = video_repo::liked_videos(&state.db, user_id.0)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}

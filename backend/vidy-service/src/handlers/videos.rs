/// Video handlers - listing, upload, playback, edits and publishing
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use super::parse_id;
use super::upload::read_multipart;
use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{
    required, NewVideo, Video, VideoChanges, VideoFilter, VideoListQuery, VideoView,
};
use crate::response::ApiResponse;
use crate::services::VideoService;
use crate::AppState;

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_duration(raw: Option<&str>) -> Result<f64> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| AppError::BadRequest("Duration must be a number of seconds".into())),
    }
}

/// Search and page through videos
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    params(
        ("page" = Option<i64>, Query, description = "1-based page, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size 1-100, default 10"),
        ("query" = Option<String>, Query, description = "Case-insensitive title/description match"),
        ("sortBy" = Option<String>, Query, description = "createdAt, views, duration or title"),
        ("sortType" = Option<String>, Query, description = "asc or desc"),
        ("userId" = Option<String>, Query, description = "Only videos of this channel")
    ),
    responses(
        (status = 200, description = "Matching videos", body = [VideoView]),
        (status = 400, description = "Malformed userId")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<VideoListQuery>,
) -> Result<HttpResponse> {
    let owner_id = match query.user_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw, "user")?),
        _ => None,
    };
    let filter = VideoFilter::new(&query, owner_id, user_id.0);

    let videos: Vec<VideoView> = video_repo::list_videos(&state.db, &filter, user_id.0)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

/// Upload a video (multipart: title, description, duration, videoFile, thumbnail)
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    tag = "videos",
    request_body(content = Object, content_type = "multipart/form-data", description = "title, description, duration, videoFile, thumbnail"),
    responses(
        (status = 201, description = "Video published", body = Video),
        (status = 400, description = "Missing field or file"),
        (status = 413, description = "Upload too large")
    ),
    security(("bearer_auth" = []))
)]
pub async fn publish_video(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, state.config.uploads.max_upload_bytes).await?;

    let title = form.take_text("title");
    let description = form.take_text("description");
    let video = NewVideo {
        title: required(&title, "All fields are required")?.to_string(),
        description: required(&description, "All fields are required")?.to_string(),
        duration: parse_duration(form.text("duration"))?,
    };
    let video_file = form.take_file("videoFile");
    let thumbnail = form.take_file("thumbnail");

    let created = VideoService::new(&state)
        .publish(user_id.0, video, video_file, thumbnail)
        .await?;

    Ok(ApiResponse::created(created, "Video uploaded successfully"))
}

/// Watch a video: counts a view and records history
#[utoipa::path(
    get,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video UUID")),
    responses(
        (status = 200, description = "Video with owner and like state", body = VideoView),
        (status = 400, description = "Invalid video ID"),
        (status = 404, description = "Video not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&path, "video")?;
    let video = VideoService::new(&state).watch(video_id, user_id.0).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

pub async fn update_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = parse_id(&path, "video")?;
    let mut form = read_multipart(payload, state.config.uploads.max_upload_bytes).await?;

    let changes = VideoChanges {
        title: optional_text(form.take_text("title")),
        description: optional_text(form.take_text("description")),
        thumbnail: None,
    };
    let thumbnail = form.take_file("thumbnail");

    let video = VideoService::new(&state)
        .update(video_id, user_id.0, changes, thumbnail)
        .await?;

    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

pub async fn delete_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&path, "video")?;
    let video = VideoService::new(&state).delete(video_id, user_id.0).await?;
    Ok(ApiResponse::ok(video, "Video deleted successfully"))
}

pub async fn toggle_publish(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&path, "video")?;
    let video = VideoService::new(&state)
        .toggle_publish(video_id, user_id.0)
        .await?;

    let message = if video.is_published {
        "Video published"
    } else {
        "Video unpublished"
    };
    Ok(ApiResponse::ok(video, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(None).expect("default"), 0.0);
        assert_eq!(parse_duration(Some(" ")).expect("blank"), 0.0);
        assert_eq!(parse_duration(Some("12.5")).expect("number"), 12.5);
        assert!(parse_duration(Some("ten")).is_err());
    }

    #[test]
    fn test_optional_text_trims_and_drops_blank() {
        assert_eq!(optional_text("  hi ".into()), Some("hi".into()));
        assert_eq!(optional_text("   ".into()), None);
    }
}

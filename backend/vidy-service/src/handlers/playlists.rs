/// Playlist handlers - ordered video collections owned by a user
use actix_web::{web, HttpResponse};
use validator::Validate;

use super::parse_id;
use crate::db::{playlist_repo, user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::{ensure_owner, UserId};
use crate::models::{
    required, CreatePlaylistRequest, Playlist, PlaylistDetail, UpdatePlaylistRequest, VideoView,
};
use crate::response::ApiResponse;
use crate::AppState;

async fn owned_playlist(state: &AppState, raw_id: &str, user_id: UserId) -> Result<Playlist> {
    let playlist_id = parse_id(raw_id, "playlist")?;
    let playlist = playlist_repo::find_by_id(&state.db, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;
    ensure_owner(playlist.owner_id, user_id.0, "playlist")?;
    Ok(playlist)
}

async fn reload(state: &AppState, playlist_id: uuid::Uuid) -> Result<Playlist> {
    playlist_repo::find_by_id(&state.db, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/playlist",
    tag = "playlist",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = Playlist),
        (status = 400, description = "Name is required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_playlist(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<CreatePlaylistRequest>,
) -> Result<HttpResponse> {
    let name = required(&body.name, "Playlist name is required")?;
    body.validate()?;

    let playlist =
        playlist_repo::create_playlist(&state.db, user_id.0, name, body.description.trim())
            .await?;
    tracing::info!(playlist_id = %playlist.id, user_id = %user_id.0, "playlist created");

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

pub async fn user_playlists(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let owner_id = parse_id(&path, "user")?;
    if !user_repo::exists(&state.db, owner_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    let playlists = playlist_repo::by_owner(&state.db, owner_id).await?;
    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}

pub async fn get_playlist(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let playlist_id = parse_id(&path, "playlist")?;
    let playlist = playlist_repo::find_by_id(&state.db, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;

    let owner = user_repo::owner_summary(&state.db, playlist.owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist owner not found".into()))?;

    let videos: Vec<VideoView> = playlist_repo::playlist_videos(&state.db, playlist_id, user_id.0)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(ApiResponse::ok(
        PlaylistDetail::new(playlist, owner, videos),
        "Playlist fetched successfully",
    ))
}

pub async fn update_playlist(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<UpdatePlaylistRequest>,
) -> Result<HttpResponse> {
    let (name, description) = body.changes().ok_or_else(|| {
        AppError::BadRequest("Name or description is required".into())
    })?;
    body.validate()?;
    let playlist = owned_playlist(&state, &path, user_id).await?;

    let updated = playlist_repo::update_playlist(
        &state.db,
        playlist.id,
        name.as_deref(),
        description.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;

    Ok(ApiResponse::ok(updated, "Playlist updated successfully"))
}

pub async fn delete_playlist(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let playlist = owned_playlist(&state, &path, user_id).await?;

    let deleted = playlist_repo::delete_playlist(&state.db, playlist.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;
    tracing::info!(playlist_id = %deleted.id, user_id = %user_id.0, "playlist deleted");

    Ok(ApiResponse::ok(deleted, "Playlist deleted successfully"))
}

pub async fn add_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (raw_video, raw_playlist) = path.into_inner();
    let video_id = parse_id(&raw_video, "video")?;
    let playlist = owned_playlist(&state, &raw_playlist, user_id).await?;

    video_repo::find_by_id(&state.db, video_id)
        .await?
        .filter(|v| v.is_published || v.owner_id == user_id.0)
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    if !playlist_repo::add_video(&state.db, playlist.id, video_id).await? {
        return Err(AppError::Conflict("Video is already in the playlist".into()));
    }
    tracing::info!(playlist_id = %playlist.id, %video_id, "video added to playlist");

    let updated = reload(&state, playlist.id).await?;
    Ok(ApiResponse::ok(updated, "Video added to playlist"))
}

pub async fn remove_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (raw_video, raw_playlist) = path.into_inner();
    let video_id = parse_id(&raw_video, "video")?;
    let playlist = owned_playlist(&state, &raw_playlist, user_id).await?;

    if !playlist_repo::remove_video(&state.db, playlist.id, video_id).await? {
        return Err(AppError::NotFound("Video is not in the playlist".into()));
    }
    tracing::info!(playlist_id = %playlist.id, %video_id, "video removed from playlist");

    let updated = reload(&state, playlist.id).await?;
    Ok(ApiResponse::ok(updated, "Video removed from playlist"))
}

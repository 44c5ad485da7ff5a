/// Channel dashboard for the signed-in user
use actix_web::{web, HttpResponse};

use crate::db::dashboard_repo;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{ChannelStats, VideoView};
use crate::response::ApiResponse;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "dashboard",
    responses((status = 200, description = "Channel totals", body = ChannelStats)),
    security(("bearer_auth" = []))
)]
pub async fn channel_stats(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let stats = dashboard_repo::channel_stats(&state.db, user_id.0).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// Every video on the channel, drafts included
pub async fn channel_videos(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let videos: Vec<VideoView> = dashboard_repo::channel_videos(&state.db, user_id.0)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Aggregate numbers for the requester's channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

use super::video_repo::video_select;
use crate::models::{ChannelStats, VideoRow};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn channel_stats(pool: &PgPool, owner_id: Uuid) -> Result<ChannelStats, sqlx::Error> {
    sqlx::query_as::<_, ChannelStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM videos v WHERE v.owner_id = $1) AS total_videos,
            (SELECT COALESCE(SUM(v.views), 0)::BIGINT FROM videos v WHERE v.owner_id = $1)
                AS total_views,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = $1) AS total_subscribers,
            (SELECT COUNT(*) FROM likes l JOIN videos v ON v.id = l.video_id
                WHERE v.owner_id = $1) AS total_likes
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

/// All of the owner's videos, published or not, newest first
pub async fn channel_videos(pool: &PgPool, owner_id: Uuid) -> Result<Vec<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(&format!(
        "{} WHERE v.owner_id = $1 ORDER BY v.created_at DESC, v.id DESC",
        video_select()
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

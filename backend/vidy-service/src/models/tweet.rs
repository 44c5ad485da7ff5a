use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::OwnerSummary;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TweetRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TweetRow> for TweetView {
    fn from(row: TweetRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            owner: OwnerSummary {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar: row.owner_avatar,
            },
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            is_liked: row.is_liked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::OwnerSummary;

/// What a comment hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    Video(Uuid),
    Tweet(Uuid),
}

impl CommentParent {
    pub fn column(&self) -> &'static str {
        match self {
            CommentParent::Video(_) => "video_id",
            CommentParent::Tweet(_) => "tweet_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            CommentParent::Video(id) | CommentParent::Tweet(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "video")]
    pub video_id: Option<Uuid>,
    #[serde(rename = "tweet")]
    pub tweet_id: Option<Uuid>,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub video_id: Option<Uuid>,
    pub tweet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
    pub likes_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub video: Option<Uuid>,
    pub tweet: Option<Uuid>,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            video: row.video_id,
            tweet: row.tweet_id,
            owner: OwnerSummary {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar: row.owner_avatar,
            },
            likes_count: row.likes_count,
            is_liked: row.is_liked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Video models and listing query normalisation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{OwnerSummary, Page};

/// Raw `videos` row
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video joined with its owner and like counters
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
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
pub struct VideoView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoView {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id,
            video_file: row.video_file,
            thumbnail: row.thumbnail,
            title: row.title,
            description: row.description,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
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

/// Raw query string of `GET /videos`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSort {
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSort {
    /// Unknown keys fall back to creation time
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("views") => VideoSort::Views,
            Some("duration") => VideoSort::Duration,
            Some("title") => VideoSort::Title,
            _ => VideoSort::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            VideoSort::CreatedAt => "v.created_at",
            VideoSort::Views => "v.views",
            VideoSort::Duration => "v.duration",
            VideoSort::Title => "v.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated listing filter handed to the repository
#[derive(Debug, Clone)]
pub struct VideoFilter {
    pub page: Page,
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub published_only: bool,
    pub sort: VideoSort,
    pub direction: SortDirection,
}

impl VideoFilter {
    /// `owner_id` must already be parsed; unpublished videos are only
    /// visible when the requester lists their own channel.
    pub fn new(query: &VideoListQuery, owner_id: Option<Uuid>, requester: Uuid) -> Self {
        Self {
            page: Page::new(query.page, query.limit),
            search: query
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            owner_id,
            published_only: owner_id != Some(requester),
            sort: VideoSort::parse(query.sort_by.as_deref()),
            direction: SortDirection::parse(query.sort_type.as_deref()),
        }
    }
}

/// Text fields of the multipart upload form
#[derive(Debug, Clone, Default, Validate)]
pub struct NewVideo {
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,
    pub duration: f64,
}

/// Partial update of a video's metadata
#[derive(Debug, Clone, Default, Validate)]
pub struct VideoChanges {
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

impl VideoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.thumbnail.is_none()
    }
}

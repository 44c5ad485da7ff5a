use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{OwnerSummary, VideoView};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist card in a user's playlist list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub total_videos: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: OwnerSummary,
    pub total_videos: i64,
    pub videos: Vec<VideoView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistDetail {
    pub fn new(playlist: Playlist, owner: OwnerSummary, videos: Vec<VideoView>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            owner,
            total_videos: videos.len() as i64,
            videos,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlaylistRequest {
    #[validate(length(max = 255, message = "Name is too long"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePlaylistRequest {
    #[validate(length(max = 255, message = "Name is too long"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,
}

impl UpdatePlaylistRequest {
    /// Trimmed non-blank values; `None` when nothing usable was sent
    pub fn changes(&self) -> Option<(Option<String>, Option<String>)> {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let name = clean(&self.name);
        let description = clean(&self.description);
        if name.is_none() && description.is_none() {
            return None;
        }
        Some((name, description))
    }
}

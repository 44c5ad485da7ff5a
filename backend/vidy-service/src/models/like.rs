use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Something a user can like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    pub fn id(&self) -> Uuid {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => *id,
        }
    }

    /// Column in `likes` referencing the target
    pub fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }

    /// Table the target lives in
    pub fn table(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "videos",
            LikeTarget::Comment(_) => "comments",
            LikeTarget::Tweet(_) => "tweets",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "Video",
            LikeTarget::Comment(_) => "Comment",
            LikeTarget::Tweet(_) => "Tweet",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct LikeToggle {
    pub liked: bool,
}

use crate::models::{Comment, CommentParent, CommentRow, Page};
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, content, video_id, tweet_id, owner_id, created_at, updated_at";

/// `$1` is the viewer
const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.content, c.video_id, c.tweet_id, c.created_at, c.updated_at,
           u.id AS owner_id, u.username AS owner_username,
           u.full_name AS owner_full_name, u.avatar AS owner_avatar,
           (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id) AS likes_count,
           EXISTS(SELECT 1 FROM likes l WHERE l.comment_id = c.id AND l.liked_by = $1) AS is_liked
    FROM comments c
    JOIN users u ON u.id = c.owner_id
"#;

/// Comments under a video or tweet, newest first
pub async fn list_for(
    pool: &PgPool,
    parent: CommentParent,
    page: Page,
    viewer: Uuid,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(&format!(
        "{} WHERE c.{} = $2 ORDER BY c.created_at DESC, c.id DESC LIMIT $3 OFFSET $4",
        COMMENT_SELECT,
        parent.column()
    ))
    .bind(viewer)
    .bind(parent.id())
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn create_comment(
    pool: &PgPool,
    parent: CommentParent,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (content, {}, owner_id) VALUES ($1, $2, $3) RETURNING {}",
        parent.column(),
        COMMENT_COLUMNS
    ))
    .bind(content)
    .bind(parent.id())
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE id = $1",
        COMMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_comment(
    pool: &PgPool,
    id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "DELETE FROM comments WHERE id = $1 RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

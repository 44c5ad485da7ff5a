use crate::models::{Tweet, TweetRow};
use sqlx::PgPool;
use uuid::Uuid;

const TWEET_COLUMNS: &str = "id, content, owner_id, created_at, updated_at";

/// `$1` is the viewer
const TWEET_SELECT: &str = r#"
    SELECT t.id, t.content, t.created_at, t.updated_at,
           u.id AS owner_id, u.username AS owner_username,
           u.full_name AS owner_full_name, u.avatar AS owner_avatar,
           (SELECT COUNT(*) FROM likes l WHERE l.tweet_id = t.id) AS likes_count,
           (SELECT COUNT(*) FROM comments c WHERE c.tweet_id = t.id) AS comments_count,
           EXISTS(SELECT 1 FROM likes l WHERE l.tweet_id = t.id AND l.liked_by = $1) AS is_liked
    FROM tweets t
    JOIN users u ON u.id = t.owner_id
"#;

pub async fn create_tweet(pool: &PgPool, owner_id: Uuid, content: &str) -> Result<Tweet, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        "INSERT INTO tweets (content, owner_id) VALUES ($1, $2) RETURNING {}",
        TWEET_COLUMNS
    ))
    .bind(content)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!("SELECT {} FROM tweets WHERE id = $1", TWEET_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every tweet, newest first
pub async fn feed(pool: &PgPool, viewer: Uuid) -> Result<Vec<TweetRow>, sqlx::Error> {
    sqlx::query_as::<_, TweetRow>(&format!(
        "{} ORDER BY t.created_at DESC, t.id DESC",
        TWEET_SELECT
    ))
    .bind(viewer)
    .fetch_all(pool)
    .await
}

pub async fn by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    viewer: Uuid,
) -> Result<Vec<TweetRow>, sqlx::Error> {
    sqlx::query_as::<_, TweetRow>(&format!(
        "{} WHERE t.owner_id = $2 ORDER BY t.created_at DESC, t.id DESC",
        TWEET_SELECT
    ))
    .bind(viewer)
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn update_tweet(
    pool: &PgPool,
    id: Uuid,
    content: &str,
) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        "UPDATE tweets SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        TWEET_COLUMNS
    ))
    .bind(id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

pub async fn delete_tweet(pool: &PgPool, id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        "DELETE FROM tweets WHERE id = $1 RETURNING {}",
        TWEET_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

use super::escape_like;
use crate::models::{NewVideo, Video, VideoChanges, VideoFilter, VideoRow};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, video_file, thumbnail, title, description, duration, views, \
     is_published, owner_id, created_at, updated_at";

/// Everything up to the viewer bind of the joined video projection
const VIDEO_SELECT_HEAD: &str = r#"
    SELECT v.id, v.video_file, v.thumbnail, v.title, v.description, v.duration, v.views,
           v.is_published, v.created_at, v.updated_at,
           u.id AS owner_id, u.username AS owner_username,
           u.full_name AS owner_full_name, u.avatar AS owner_avatar,
           (SELECT COUNT(*) FROM likes l WHERE l.video_id = v.id) AS likes_count,
           EXISTS(SELECT 1 FROM likes l WHERE l.video_id = v.id AND l.liked_by = "#;

const VIDEO_SELECT_TAIL: &str = ") AS is_liked FROM videos v JOIN users u ON u.id = v.owner_id";

/// Joined projection decoding into [`VideoRow`]; `$1` is the viewer
pub(crate) fn video_select() -> String {
    format!("{}$1{}", VIDEO_SELECT_HEAD, VIDEO_SELECT_TAIL)
}

/// Search, filter, sort and paginate videos for `viewer`
pub async fn list_videos(
    pool: &PgPool,
    filter: &VideoFilter,
    viewer: Uuid,
) -> Result<Vec<VideoRow>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(VIDEO_SELECT_HEAD);
    qb.push_bind(viewer);
    qb.push(VIDEO_SELECT_TAIL);
    qb.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (v.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND v.owner_id = ").push_bind(owner_id);
    }

    if filter.published_only {
        qb.push(" AND v.is_published");
    }

    // sort column and direction come from closed enums
    qb.push(format!(
        " ORDER BY {col} {dir}, v.id {dir}",
        col = filter.sort.column(),
        dir = filter.direction.sql()
    ));
    qb.push(" LIMIT ")
        .push_bind(filter.page.limit)
        .push(" OFFSET ")
        .push_bind(filter.page.offset());

    qb.build_query_as::<VideoRow>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// One video with owner and like state for `viewer`
pub async fn find_view(
    pool: &PgPool,
    id: Uuid,
    viewer: Uuid,
) -> Result<Option<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(&format!("{} WHERE v.id = $2", video_select()))
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    video: &NewVideo,
    video_url: &str,
    thumbnail_url: &str,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (video_file, thumbnail, title, description, duration, is_published, owner_id)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6)
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    ))
    .bind(video_url)
    .bind(thumbnail_url)
    .bind(&video.title)
    .bind(&video.description)
    .bind(video.duration)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn update_video(
    pool: &PgPool,
    id: Uuid,
    changes: &VideoChanges,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail = COALESCE($4, thumbnail),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    ))
    .bind(id)
    .bind(changes.title.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.thumbnail.as_deref())
    .fetch_optional(pool)
    .await
}

pub async fn delete_video(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "DELETE FROM videos WHERE id = $1 RETURNING {}",
        VIDEO_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn toggle_publish(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Put `video_id` at the front of the user's watch history
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id, watched_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = EXCLUDED.watched_at
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Watched videos, most recent first; videos unpublished since are hidden
/// unless the viewer owns them
pub async fn watch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(&format!(
        r#"
        {}
        JOIN watch_history h ON h.video_id = v.id
        WHERE h.user_id = $1 AND (v.is_published OR v.owner_id = $1)
        ORDER BY h.watched_at DESC
        "#,
        video_select()
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Videos the user liked, newest like first
pub async fn liked_videos(pool: &PgPool, user_id: Uuid) -> Result<Vec<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(&format!(
        r#"
        {}
        JOIN likes lk ON lk.video_id = v.id
        WHERE lk.liked_by = $1 AND (v.is_published OR v.owner_id = $1)
        ORDER BY lk.created_at DESC
        "#,
        video_select()
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

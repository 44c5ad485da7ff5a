use super::video_repo::video_select;
use crate::models::{Playlist, PlaylistSummary, VideoRow};
use sqlx::PgPool;
use uuid::Uuid;

const PLAYLIST_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

pub async fn create_playlist(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        "INSERT INTO playlists (name, description, owner_id) VALUES ($1, $2, $3) RETURNING {}",
        PLAYLIST_COLUMNS
    ))
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        "SELECT {} FROM playlists WHERE id = $1",
        PLAYLIST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// A user's playlists with their video counts, newest first
pub async fn by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<PlaylistSummary>, sqlx::Error> {
    sqlx::query_as::<_, PlaylistSummary>(
        r#"
        SELECT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at,
               (SELECT COUNT(*) FROM playlist_videos pv WHERE pv.playlist_id = p.id) AS total_videos
        FROM playlists p
        WHERE p.owner_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Videos of a playlist in insertion order, as visible to `viewer`
pub async fn playlist_videos(
    pool: &PgPool,
    playlist_id: Uuid,
    viewer: Uuid,
) -> Result<Vec<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(&format!(
        r#"
        {}
        JOIN playlist_videos pv ON pv.video_id = v.id
        WHERE pv.playlist_id = $2 AND (v.is_published OR v.owner_id = $1)
        ORDER BY pv.added_at ASC
        "#,
        video_select()
    ))
    .bind(viewer)
    .bind(playlist_id)
    .fetch_all(pool)
    .await
}

pub async fn update_playlist(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        r#"
        UPDATE playlists
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PLAYLIST_COLUMNS
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn delete_playlist(pool: &PgPool, id: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        "DELETE FROM playlists WHERE id = $1 RETURNING {}",
        PLAYLIST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns false when the video was already in the playlist
pub async fn add_video(pool: &PgPool, playlist_id: Uuid, video_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO playlist_videos (playlist_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (playlist_id, video_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(video_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        touch(&mut tx, playlist_id).await?;
    }
    tx.commit().await?;

    Ok(inserted)
}

/// Returns false when the video was not in the playlist
pub async fn remove_video(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        "DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2",
    )
    .bind(playlist_id)
    .bind(video_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if removed {
        touch(&mut tx, playlist_id).await?;
    }
    tx.commit().await?;

    Ok(removed)
}

async fn touch(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    playlist_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
        .bind(playlist_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

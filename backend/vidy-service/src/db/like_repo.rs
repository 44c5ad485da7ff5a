use crate::models::LikeTarget;
use sqlx::PgPool;
use uuid::Uuid;

/// Whether `target` exists and `viewer` may see it; unpublished videos are
/// only visible to their owner
pub async fn target_visible(
    pool: &PgPool,
    target: LikeTarget,
    viewer: Uuid,
) -> Result<bool, sqlx::Error> {
    match target {
        LikeTarget::Video(id) => {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1 AND (is_published OR owner_id = $2))",
            )
            .bind(id)
            .bind(viewer)
            .fetch_one(pool)
            .await
        }
        _ => {
            sqlx::query_scalar::<_, bool>(&format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
                target.table()
            ))
            .bind(target.id())
            .fetch_one(pool)
            .await
        }
    }
}

/// Flip the like of `user_id` on `target`; returns the new state
///
/// Delete first: if a row went away the user un-liked. Otherwise insert,
/// and a concurrent duplicate is absorbed by the partial unique index.
pub async fn toggle_like(
    pool: &PgPool,
    target: LikeTarget,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let column = target.column();

    let removed = sqlx::query(&format!(
        "DELETE FROM likes WHERE {} = $1 AND liked_by = $2",
        column
    ))
    .bind(target.id())
    .bind(user_id)
    .execute(pool)
    .await?;

    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(&format!(
        r#"
        INSERT INTO likes ({col}, liked_by)
        VALUES ($1, $2)
        ON CONFLICT ({col}, liked_by) WHERE {col} IS NOT NULL DO NOTHING
        "#,
        col = column
    ))
    .bind(target.id())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(true)
}

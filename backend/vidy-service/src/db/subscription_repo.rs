use crate::models::OwnerSummary;
use sqlx::PgPool;
use uuid::Uuid;

/// Flip the subscription of `subscriber_id` to `channel_id`; returns the new state
pub async fn toggle_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query(
        "DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?;

    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?;

    Ok(true)
}

/// Users subscribed to a channel, most recent first
pub async fn subscribers_of(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<OwnerSummary>, sqlx::Error> {
    sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await
}

/// Channels a user subscribed to, most recent first
pub async fn channels_of(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<OwnerSummary>, sqlx::Error> {
    sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await
}

use crate::models::{ChannelProfile, LoginIdentifier, OwnerSummary, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, password_hash, \
     refresh_token, created_at, updated_at";

/// Fields of a user about to be inserted
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
    pub avatar: &'a str,
    pub cover_image: Option<&'a str>,
    pub password_hash: &'a str,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &LoginIdentifier,
) -> Result<Option<User>, sqlx::Error> {
    let (column, value) = match identifier {
        LoginIdentifier::Email(email) => ("email", email),
        LoginIdentifier::Username(username) => ("username", username),
    };

    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE {} = $1",
        USER_COLUMNS, column
    ))
    .bind(value)
    .fetch_optional(pool)
    .await
}

/// Whether the username or the email is already taken
pub async fn exists_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn create_user(pool: &PgPool, user: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, full_name, avatar, cover_image, password_hash)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user.username)
    .bind(user.email)
    .bind(user.full_name)
    .bind(user.avatar)
    .bind(user.cover_image)
    .bind(user.password_hash)
    .fetch_one(pool)
    .await
}

pub async fn set_refresh_token(
    pool: &PgPool,
    id: Uuid,
    token: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
        .bind(id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the stored refresh token only if it still equals `expected`
///
/// Returns false when another request rotated it first.
pub async fn rotate_refresh_token(
    pool: &PgPool,
    id: Uuid,
    expected: &str,
    next: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET refresh_token = $3 WHERE id = $1 AND refresh_token = $2",
    )
    .bind(id)
    .bind(expected)
    .bind(next)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_account(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET full_name = $2, email = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(id)
    .bind(full_name)
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn update_avatar(pool: &PgPool, id: Uuid, url: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET avatar = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(id)
    .bind(url)
    .fetch_optional(pool)
    .await
}

pub async fn update_cover_image(
    pool: &PgPool,
    id: Uuid,
    url: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET cover_image = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(id)
    .bind(url)
    .fetch_optional(pool)
    .await
}

/// Channel header for `username` as seen by `viewer`
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer: Uuid,
) -> Result<Option<ChannelProfile>, sqlx::Error> {
    sqlx::query_as::<_, ChannelProfile>(
        r#"
        SELECT u.id, u.username, u.email, u.full_name, u.avatar, u.cover_image, u.created_at,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id)
                   AS channels_subscribed_to_count,
               EXISTS(
                   SELECT 1 FROM subscriptions s
                   WHERE s.channel_id = u.id AND s.subscriber_id = $2
               ) AS is_subscribed
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username)
    .bind(viewer)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn owner_summary(pool: &PgPool, id: Uuid) -> Result<Option<OwnerSummary>, sqlx::Error> {
    sqlx::query_as::<_, OwnerSummary>(
        "SELECT id, username, full_name, avatar FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

use chrono::{DateTime, Utc};
/// User model
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::required;
use crate::error::Result;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients (no password hash, no refresh token)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar,
            cover_image: user.cover_image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Channel page header: the user plus subscription counters
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

/// Text fields of the multipart registration form
#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(max = 255, message = "Full name is too long"))]
    pub full_name: String,
    #[validate(
        email(message = "Email is invalid"),
        length(max = 255, message = "Email is too long")
    )]
    pub email: String,
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    /// Trim the identity fields, reject blanks and normalise username/email
    /// case. The password is kept exactly as typed.
    pub fn normalized(self) -> Result<Self> {
        required(&self.password, "All fields are required")?;
        Ok(Self {
            full_name: required(&self.full_name, "All fields are required")?.to_string(),
            email: required(&self.email, "All fields are required")?.to_lowercase(),
            username: required(&self.username, "All fields are required")?.to_lowercase(),
            password: self.password,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

/// Which identifier the client logged in with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Username(String),
}

impl LoginRequest {
    pub fn identifier(&self) -> Option<LoginIdentifier> {
        let pick = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };

        pick(&self.email)
            .map(LoginIdentifier::Email)
            .or_else(|| pick(&self.username).map(LoginIdentifier::Username))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(length(max = 255, message = "Full name is too long"))]
    pub full_name: String,
    #[validate(
        email(message = "Email is invalid"),
        length(max = 255, message = "Email is too long")
    )]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

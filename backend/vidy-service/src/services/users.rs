/// User service - registration, credential flows and profile media
use crate::db::user_repo::{self, NewUser};
use crate::error::{AppError, Result};
use crate::metrics::AUTH_EVENTS_TOTAL;
use crate::models::{required, LoginRequest, RegisterForm, UpdateAccountRequest, User};
use crate::security::{hash_password, verify_password, JwtKeys, TokenPair, TokenType};
use crate::services::media::{discard, store_upload, UploadedFile};
use crate::AppState;
use media_store::{MediaKind, MediaStore};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct UserService {
    pool: PgPool,
    media: Arc<dyn MediaStore>,
    jwt: JwtKeys,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            media: state.media.clone(),
            jwt: state.jwt.clone(),
        }
    }

    /// Create an account; the avatar is mandatory, the cover image optional
    pub async fn register(
        &self,
        form: RegisterForm,
        avatar: Option<UploadedFile>,
        cover_image: Option<UploadedFile>,
    ) -> Result<User> {
        let form = form.normalized()?;
        form.validate()?;
        let avatar = avatar.ok_or_else(|| AppError::BadRequest("Avatar file is required".into()))?;

        if user_repo::exists_by_username_or_email(&self.pool, &form.username, &form.email).await? {
            return Err(AppError::Conflict(
                "User with email or username already exists".into(),
            ));
        }

        let password_hash = hash_password(&form.password)?;

        let avatar_url = store_upload(self.media.as_ref(), MediaKind::Avatar, avatar).await?;
        let cover_url = match cover_image {
            Some(file) => match store_upload(self.media.as_ref(), MediaKind::CoverImage, file).await {
                Ok(url) => Some(url),
                Err(err) => {
                    discard(self.media.as_ref(), &avatar_url).await;
                    return Err(err);
                }
            },
            None => None,
        };

        let created = user_repo::create_user(
            &self.pool,
            NewUser {
                username: &form.username,
                email: &form.email,
                full_name: &form.full_name,
                avatar: &avatar_url,
                cover_image: cover_url.as_deref(),
                password_hash: &password_hash,
            },
        )
        .await;

        match created {
            Ok(user) => {
                AUTH_EVENTS_TOTAL.with_label_values(&["register", "ok"]).inc();
                tracing::info!(user_id = %user.id, username = %user.username, "user registered");
                Ok(user)
            }
            Err(err) => {
                discard(self.media.as_ref(), &avatar_url).await;
                if let Some(url) = &cover_url {
                    discard(self.media.as_ref(), url).await;
                }
                Err(err.into())
            }
        }
    }

    /// Verify credentials, issue a token pair and persist the refresh token
    pub async fn login(&self, req: &LoginRequest) -> Result<(User, TokenPair)> {
        let identifier = req
            .identifier()
            .ok_or_else(|| AppError::BadRequest("Username or email is required".into()))?;

        let user = user_repo::find_by_identifier(&self.pool, &identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            AUTH_EVENTS_TOTAL.with_label_values(&["login", "rejected"]).inc();
            tracing::info!(user_id = %user.id, "login rejected: bad password");
            return Err(AppError::Unauthorized("Invalid user credentials".into()));
        }

        let tokens = self.jwt.issue_pair(user.id, &user.email, &user.username)?;
        user_repo::set_refresh_token(&self.pool, user.id, Some(&tokens.refresh_token)).await?;

        AUTH_EVENTS_TOTAL.with_label_values(&["login", "ok"]).inc();
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, tokens))
    }

    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        user_repo::set_refresh_token(&self.pool, user_id, None).await?;
        tracing::info!(%user_id, "user logged out");
        Ok(())
    }

    /// Exchange a refresh token for a new pair; the old one stops working
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.jwt.validate(refresh_token, TokenType::Refresh)?;

        let user = user_repo::find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            AUTH_EVENTS_TOTAL.with_label_values(&["refresh", "rejected"]).inc();
            return Err(AppError::Unauthorized(
                "Refresh token is expired or used".into(),
            ));
        }

        let tokens = self.jwt.issue_pair(user.id, &user.email, &user.username)?;
        let rotated = user_repo::rotate_refresh_token(
            &self.pool,
            user.id,
            refresh_token,
            &tokens.refresh_token,
        )
        .await?;
        if !rotated {
            AUTH_EVENTS_TOTAL.with_label_values(&["refresh", "rejected"]).inc();
            return Err(AppError::Unauthorized(
                "Refresh token is expired or used".into(),
            ));
        }

        AUTH_EVENTS_TOTAL.with_label_values(&["refresh", "ok"]).inc();
        Ok(tokens)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self.current_user(user_id).await?;

        if !verify_password(old_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Invalid old password".into()));
        }

        let password_hash = hash_password(new_password)?;
        user_repo::update_password(&self.pool, user_id, &password_hash).await?;
        tracing::info!(%user_id, "password changed");
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User> {
        user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid access token".into()))
    }

    pub async fn update_account(&self, user_id: Uuid, req: &UpdateAccountRequest) -> Result<User> {
        let cleaned = UpdateAccountRequest {
            full_name: required(&req.full_name, "All fields are required")?.to_string(),
            email: required(&req.email, "All fields are required")?.to_lowercase(),
        };
        cleaned.validate()?;

        user_repo::update_account(&self.pool, user_id, &cleaned.full_name, &cleaned.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Replace the avatar or cover image, deleting the previous object
    pub async fn replace_image(
        &self,
        user_id: Uuid,
        kind: MediaKind,
        file: UploadedFile,
    ) -> Result<User> {
        let previous = self.current_user(user_id).await?;
        let url = store_upload(self.media.as_ref(), kind, file).await?;

        let (updated, old_url) = match kind {
            MediaKind::CoverImage => (
                user_repo::update_cover_image(&self.pool, user_id, &url).await,
                previous.cover_image,
            ),
            _ => (
                user_repo::update_avatar(&self.pool, user_id, &url).await,
                Some(previous.avatar),
            ),
        };

        match updated {
            Ok(Some(user)) => {
                if let Some(old_url) = old_url {
                    discard(self.media.as_ref(), &old_url).await;
                }
                Ok(user)
            }
            Ok(None) => {
                discard(self.media.as_ref(), &url).await;
                Err(AppError::NotFound("User not found".into()))
            }
            Err(err) => {
                discard(self.media.as_ref(), &url).await;
                Err(err.into())
            }
        }
    }
}

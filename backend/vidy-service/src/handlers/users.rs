/// User handlers - registration, sessions, account and channel endpoints
use actix_multipart::Multipart;
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use media_store::MediaKind;

use super::upload::read_multipart;
use crate::db::{user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::{UserId, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::models::{
    ChangePasswordRequest, ChannelProfile, LoginRequest, LoginResponse, RefreshTokenRequest,
    RegisterForm, TokenResponse, UpdateAccountRequest, UserView, VideoView,
};
use crate::response::ApiResponse;
use crate::security::TokenPair;
use crate::services::UserService;
use crate::AppState;

fn auth_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    let builder = Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(max_age_secs));

    if secure {
        builder.secure(true).same_site(SameSite::None).finish()
    } else {
        builder.same_site(SameSite::Lax).finish()
    }
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = auth_cookie(name, String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

/// Envelope plus both token cookies
fn respond_with_tokens<T: serde::Serialize>(
    state: &AppState,
    envelope: ApiResponse<T>,
    tokens: &TokenPair,
) -> HttpResponse {
    let secure = state.config.auth.secure_cookies;
    envelope
        .builder()
        .cookie(auth_cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            tokens.access_ttl_secs,
            secure,
        ))
        .cookie(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            tokens.refresh_ttl_secs,
            secure,
        ))
        .json(envelope)
}

/// Register a new account (multipart with avatar and optional cover image)
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body(content = Object, content_type = "multipart/form-data", description = "fullName, email, username, password, avatar, coverImage"),
    responses(
        (status = 201, description = "User registered", body = UserView),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn register(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, state.config.uploads.max_upload_bytes).await?;

    let fields = RegisterForm {
        full_name: form.take_text("fullName"),
        email: form.take_text("email"),
        username: form.take_text("username"),
        password: form.take_text("password"),
    };
    let avatar = form.take_file("avatar");
    let cover_image = form.take_file("coverImage");

    let user = UserService::new(&state)
        .register(fields, avatar, cover_image)
        .await?;

    Ok(ApiResponse::created(
        UserView::from(user),
        "User registered successfully",
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, token cookies set", body = LoginResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let (user, tokens) = UserService::new(&state).login(&body).await?;

    let envelope = ApiResponse::new(
        StatusCode::OK,
        LoginResponse {
            user: UserView::from(user),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        },
        "User logged in successfully",
    );
    Ok(respond_with_tokens(&state, envelope, &tokens))
}

pub async fn logout(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    UserService::new(&state).logout(user_id.0).await?;

    let secure = state.config.auth.secure_cookies;
    let envelope = ApiResponse::new(StatusCode::OK, serde_json::json!({}), "User logged out");
    Ok(envelope
        .builder()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE, secure))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE, secure))
        .json(envelope))
}

/// Rotate tokens using the refresh token from the cookie or the body
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    tag = "users",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair issued", body = TokenResponse),
        (status = 401, description = "Refresh token invalid, expired or already used")
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse> {
    let incoming = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".into()))?;

    let tokens = UserService::new(&state).refresh(incoming.trim()).await?;

    let envelope = ApiResponse::new(
        StatusCode::OK,
        TokenResponse {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        },
        "Access token refreshed",
    );
    Ok(respond_with_tokens(&state, envelope, &tokens))
}

pub async fn change_password(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    UserService::new(&state)
        .change_password(user_id.0, &body.old_password, &body.new_password)
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    tag = "users",
    responses(
        (status = 200, description = "Authenticated user", body = UserView),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_user(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = UserService::new(&state).current_user(user_id.0).await?;
    Ok(ApiResponse::ok(
        UserView::from(user),
        "Current user fetched successfully",
    ))
}

pub async fn update_account(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    let user = UserService::new(&state)
        .update_account(user_id.0, &body)
        .await?;

    Ok(ApiResponse::ok(
        UserView::from(user),
        "Account details updated successfully",
    ))
}

async fn replace_image(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
    kind: MediaKind,
    field: &str,
    missing: &str,
) -> Result<UserView> {
    let mut form = read_multipart(payload, state.config.uploads.max_upload_bytes).await?;
    let file = form
        .take_file(field)
        .ok_or_else(|| AppError::BadRequest(missing.to_string()))?;

    let user = UserService::new(&state)
        .replace_image(user_id.0, kind, file)
        .await?;
    Ok(UserView::from(user))
}

pub async fn update_avatar(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let user = replace_image(
        state,
        user_id,
        payload,
        MediaKind::Avatar,
        "avatar",
        "Avatar file is missing",
    )
    .await?;
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

pub async fn update_cover_image(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let user = replace_image(
        state,
        user_id,
        payload,
        MediaKind::CoverImage,
        "coverImage",
        "Cover image file is missing",
    )
    .await?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

/// Channel page header for `username`
#[utoipa::path(
    get,
    path = "/api/v1/users/c/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Channel username")),
    responses(
        (status = 200, description = "Channel profile", body = ChannelProfile),
        (status = 404, description = "Channel does not exist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn channel_profile(
    state: web::Data<AppState>,
    user_id: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is missing".into()));
    }

    let channel = user_repo::channel_profile(&state.db, &username, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".into()))?;

    Ok(ApiResponse::ok(channel, "User channel fetched successfully"))
}

pub async fn watch_history(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let videos: Vec<VideoView> = video_repo::watch_history(&state.db, user_id.0)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(ApiResponse::ok(videos, "Watch history fetched successfully"))
}

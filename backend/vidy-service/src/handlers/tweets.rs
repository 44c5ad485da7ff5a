/// Tweet handlers - short text posts on a channel
use actix_web::{web, HttpResponse};
use validator::Validate;

use super::parse_id;
use crate::db::{tweet_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::{ensure_owner, UserId};
use crate::models::{ContentRequest, Tweet, TweetView};
use crate::response::ApiResponse;
use crate::AppState;

async fn owned_tweet(state: &AppState, raw_id: &str, user_id: UserId) -> Result<Tweet> {
    let tweet_id = parse_id(raw_id, "tweet")?;
    let tweet = tweet_repo::find_by_id(&state.db, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;
    ensure_owner(tweet.owner_id, user_id.0, "tweet")?;
    Ok(tweet)
}

#[utoipa::path(
    post,
    path = "/api/v1/tweets",
    tag = "tweets",
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Tweet created", body = Tweet),
        (status = 400, description = "Content is required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<ContentRequest>,
) -> Result<HttpResponse> {
    let content = body.content()?;
    body.validate()?;

    let tweet = tweet_repo::create_tweet(&state.db, user_id.0, content).await?;
    tracing::info!(tweet_id = %tweet.id, user_id = %user_id.0, "tweet created");

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// Everyone's tweets, newest first
pub async fn tweet_feed(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let tweets: Vec<TweetView> = tweet_repo::feed(&state.db, user_id.0)
        .await?
        .into_iter()
        .map(TweetView::from)
        .collect();

    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

pub async fn user_tweets(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let owner_id = parse_id(&path, "user")?;
    if !user_repo::exists(&state.db, owner_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    let tweets: Vec<TweetView> = tweet_repo::by_owner(&state.db, owner_id, user_id.0)
        .await?
        .into_iter()
        .map(TweetView::from)
        .collect();

    Ok(ApiResponse::ok(tweets, "User tweets fetched successfully"))
}

pub async fn update_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<ContentRequest>,
) -> Result<HttpResponse> {
    let content = body.content()?;
    body.validate()?;
    let tweet = owned_tweet(&state, &path, user_id).await?;

    let updated = tweet_repo::update_tweet(&state.db, tweet.id, content)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;

    Ok(ApiResponse::ok(updated, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let tweet = owned_tweet(&state, &path, user_id).await?;

    let deleted = tweet_repo::delete_tweet(&state.db, tweet.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;
    tracing::info!(tweet_id = %deleted.id, user_id = %user_id.0, "tweet deleted");

    Ok(ApiResponse::ok(deleted, "Tweet deleted successfully"))
}

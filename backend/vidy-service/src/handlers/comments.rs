/// Comment handlers - threads under videos and tweets
use actix_web::{web, HttpResponse};
use validator::Validate;

use super::parse_id;
use crate::db::{comment_repo, tweet_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::{ensure_owner, UserId};
use crate::models::{Comment, CommentParent, CommentView, ContentRequest, Page, PageQuery};
use crate::response::ApiResponse;
use crate::AppState;

/// 404 unless the parent exists and is visible to `user_id`
async fn ensure_parent(state: &AppState, parent: CommentParent, user_id: UserId) -> Result<()> {
    match parent {
        CommentParent::Video(id) => {
            video_repo::find_by_id(&state.db, id)
                .await?
                .filter(|v| v.is_published || v.owner_id == user_id.0)
                .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
        }
        CommentParent::Tweet(id) => {
            tweet_repo::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;
        }
    }
    Ok(())
}

async fn list(
    state: &AppState,
    parent: CommentParent,
    query: &PageQuery,
    user_id: UserId,
) -> Result<Vec<CommentView>> {
    ensure_parent(state, parent, user_id).await?;
    let rows = comment_repo::list_for(&state.db, parent, Page::from(query), user_id.0).await?;
    Ok(rows.into_iter().map(CommentView::from).collect())
}

async fn add(
    state: &AppState,
    parent: CommentParent,
    body: &ContentRequest,
    user_id: UserId,
) -> Result<Comment> {
    let content = body.content()?;
    body.validate()?;
    ensure_parent(state, parent, user_id).await?;

    let comment = comment_repo::create_comment(&state.db, parent, user_id.0, content).await?;
    tracing::info!(comment_id = %comment.id, user_id = %user_id.0, "comment added");
    Ok(comment)
}

async fn owned_comment(state: &AppState, raw_id: &str, user_id: UserId) -> Result<Comment> {
    let comment_id = parse_id(raw_id, "comment")?;
    let comment = comment_repo::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
    ensure_owner(comment.owner_id, user_id.0, "comment")?;
    Ok(comment)
}

pub async fn video_comments(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let parent = CommentParent::Video(parse_id(&path, "video")?);
    let comments = list(&state, parent, &query, user_id).await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

pub async fn add_video_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<ContentRequest>,
) -> Result<HttpResponse> {
    let parent = CommentParent::Video(parse_id(&path, "video")?);
    let comment = add(&state, parent, &body, user_id).await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

pub async fn tweet_comments(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let parent = CommentParent::Tweet(parse_id(&path, "tweet")?);
    let comments = list(&state, parent, &query, user_id).await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

pub async fn add_tweet_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<ContentRequest>,
) -> Result<HttpResponse> {
    let parent = CommentParent::Tweet(parse_id(&path, "tweet")?);
    let comment = add(&state, parent, &body, user_id).await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

pub async fn update_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<ContentRequest>,
) -> Result<HttpResponse> {
    let content = body.content()?;
    body.validate()?;
    let comment = owned_comment(&state, &path, user_id).await?;

    let updated = comment_repo::update_comment(&state.db, comment.id, content)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    Ok(ApiResponse::ok(updated, "Comment updated successfully"))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let comment = owned_comment(&state, &path, user_id).await?;

    let deleted = comment_repo::delete_comment(&state.db, comment.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
    tracing::info!(comment_id = %deleted.id, user_id = %user_id.0, "comment deleted");

    Ok(ApiResponse::ok(deleted, "Comment deleted successfully"))
}

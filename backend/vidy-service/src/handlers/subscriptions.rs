/// Subscription handlers - follow a channel and list both sides of the relation
use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{ChannelSubscribers, SubscribedChannels, SubscriptionToggle};
use crate::response::ApiResponse;
use crate::AppState;

async fn ensure_user(state: &AppState, id: uuid::Uuid, missing: &str) -> Result<()> {
    if !user_repo::exists(&state.db, id).await? {
        return Err(AppError::NotFound(missing.to_string()));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/c/{channelId}",
    tag = "subscriptions",
    params(("channelId" = String, Path, description = "Channel (user) UUID")),
    responses(
        (status = 200, description = "New subscription state", body = SubscriptionToggle),
        (status = 400, description = "Cannot subscribe to own channel"),
        (status = 404, description = "Channel not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_subscription(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let channel_id = parse_id(&path, "channel")?;
    if channel_id == user_id.0 {
        return Err(AppError::BadRequest(
            "You cannot subscribe to your own channel".into(),
        ));
    }
    ensure_user(&state, channel_id, "Channel not found").await?;

    let subscribed =
        subscription_repo::toggle_subscription(&state.db, user_id.0, channel_id).await?;
    tracing::info!(%channel_id, subscriber_id = %user_id.0, subscribed, "subscription toggled");

    let message = if subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(ApiResponse::ok(SubscriptionToggle { subscribed }, message))
}

pub async fn channel_subscribers(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let channel_id = parse_id(&path, "channel")?;
    ensure_user(&state, channel_id, "Channel not found").await?;

    let subscribers = subscription_repo::subscribers_of(&state.db, channel_id).await?;
    let data = ChannelSubscribers {
        total_subscribers: subscribers.len() as i64,
        subscribers,
    };

    Ok(ApiResponse::ok(data, "Subscribers fetched successfully"))
}

pub async fn subscribed_channels(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let subscriber_id = parse_id(&path, "subscriber")?;
    ensure_user(&state, subscriber_id, "User not found").await?;

    let channels = subscription_repo::channels_of(&state.db, subscriber_id).await?;
    let data = SubscribedChannels {
        total_channels: channels.len() as i64,
        channels,
    };

    Ok(ApiResponse::ok(data, "Subscribed channels fetched successfully"))
}

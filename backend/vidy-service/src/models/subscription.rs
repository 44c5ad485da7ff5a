use serde::Serialize;
use utoipa::ToSchema;

use super::OwnerSummary;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSubscribers {
    pub total_subscribers: i64,
    pub subscribers: Vec<OwnerSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannels {
    pub total_channels: i64,
    pub channels: Vec<OwnerSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SubscriptionToggle {
    pub subscribed: bool,
}

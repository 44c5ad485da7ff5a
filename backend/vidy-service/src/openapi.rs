/// OpenAPI documentation for the Vidy API
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    dashboard, health, likes, playlists, subscriptions, tweets, users, videos,
};
use crate::models::{
    ChangePasswordRequest, ChannelProfile, ChannelStats, ChannelSubscribers, Comment,
    CommentView, ContentRequest, CreatePlaylistRequest, LikeToggle, LoginRequest, LoginResponse,
    OwnerSummary, Playlist, PlaylistDetail, PlaylistSummary, RefreshTokenRequest,
    SubscribedChannels, SubscriptionToggle, TokenResponse, Tweet, TweetView,
    UpdateAccountRequest, UpdatePlaylistRequest, UserView, Video, VideoView,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidy API",
        version = "1.0.0",
        description = "Video-sharing backend: accounts, videos, tweets, comments, likes, playlists, subscriptions and the creator dashboard. Every response is wrapped in a `{statusCode, data, message, success}` envelope.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    paths(
        health::healthcheck,
        health::readiness,
        users::register,
        users::login,
        users::refresh_token,
        users::current_user,
        users::channel_profile,
        videos::list_videos,
        videos::publish_video,
        videos::get_video,
        tweets::create_tweet,
        likes::toggle_video_like,
        playlists::create_playlist,
        subscriptions::toggle_subscription,
        dashboard::channel_stats,
    ),
    components(schemas(
        health::HealthStatus,
        health::ReadinessResponse,
        health::ComponentCheck,
        health::ComponentStatus,
        OwnerSummary,
        UserView,
        ChannelProfile,
        LoginRequest,
        LoginResponse,
        TokenResponse,
        RefreshTokenRequest,
        ChangePasswordRequest,
        UpdateAccountRequest,
        Video,
        VideoView,
        Tweet,
        TweetView,
        Comment,
        CommentView,
        ContentRequest,
        LikeToggle,
        Playlist,
        PlaylistSummary,
        PlaylistDetail,
        CreatePlaylistRequest,
        UpdatePlaylistRequest,
        ChannelSubscribers,
        SubscribedChannels,
        SubscriptionToggle,
        ChannelStats,
    )),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "users", description = "Registration, sessions, profile and channel pages"),
        (name = "videos", description = "Video upload, listing, playback and publishing"),
        (name = "tweets", description = "Short text posts on a channel"),
        (name = "comments", description = "Comments on videos and tweets"),
        (name = "likes", description = "Like toggles on videos, comments and tweets"),
        (name = "playlist", description = "User playlists"),
        (name = "subscriptions", description = "Channel subscriptions"),
        (name = "dashboard", description = "Creator statistics"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from /users/login; the accessToken cookie works too",
                        ))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }

    /// Swagger UI under `/swagger-ui/`, which also serves the JSON document
    pub fn swagger_ui() -> SwaggerUi {
        SwaggerUi::new("/swagger-ui/{_:.*}").url(Self::openapi_json_path(), Self::openapi())
    }
}

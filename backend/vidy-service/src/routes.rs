/// URL layout for the REST API
///
/// Everything lives under `/api/v1`. Liveness, readiness and the three
/// credential endpoints are public; every other scope sits behind
/// [`JwtAuthMiddleware`]. Credential endpoints additionally go through the
/// per-IP [`AuthRateLimiter`].
use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::handlers::{
    comments, dashboard, health, likes, playlists, subscriptions, tweets, users, videos,
};
use crate::middleware::{AuthRateLimiter, JwtAuthMiddleware};

/// Upper bound for JSON bodies; media goes through multipart
const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig, limiter: AuthRateLimiter) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .route("/healthcheck", web::get().to(health::healthcheck))
            .route("/health/ready", web::get().to(health::readiness))
            // public user routes must precede the protected /users scope
            .service(
                web::resource("/users/register")
                    .wrap(limiter.clone())
                    .route(web::post().to(users::register)),
            )
            .service(
                web::resource("/users/login")
                    .wrap(limiter.clone())
                    .route(web::post().to(users::login)),
            )
            .service(
                web::resource("/users/refresh-token")
                    .wrap(limiter)
                    .route(web::post().to(users::refresh_token)),
            )
            .service(
                web::scope("/users")
                    .wrap(JwtAuthMiddleware)
                    .configure(user_routes),
            )
            .service(
                web::scope("/videos")
                    .wrap(JwtAuthMiddleware)
                    .configure(video_routes),
            )
            .service(
                web::scope("/tweets")
                    .wrap(JwtAuthMiddleware)
                    .configure(tweet_routes),
            )
            .service(
                web::scope("/comments")
                    .wrap(JwtAuthMiddleware)
                    .configure(comment_routes),
            )
            .service(
                web::scope("/likes")
                    .wrap(JwtAuthMiddleware)
                    .configure(like_routes),
            )
            .service(
                web::scope("/playlist")
                    .wrap(JwtAuthMiddleware)
                    .configure(playlist_routes),
            )
            .service(
                web::scope("/subscriptions")
                    .wrap(JwtAuthMiddleware)
                    .configure(subscription_routes),
            )
            .service(
                web::scope("/dashboard")
                    .wrap(JwtAuthMiddleware)
                    .configure(dashboard_routes),
            ),
    );
}

fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/logout", web::post().to(users::logout))
        .route("/change-password", web::post().to(users::change_password))
        .route("/current-user", web::get().to(users::current_user))
        .route("/update-account", web::patch().to(users::update_account))
        .route("/avatar", web::patch().to(users::update_avatar))
        .route("/cover-image", web::patch().to(users::update_cover_image))
        .route("/c/{username}", web::get().to(users::channel_profile))
        .route("/history", web::get().to(users::watch_history));
}

fn video_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(videos::list_videos))
            .route(web::post().to(videos::publish_video)),
    )
    .route(
        "/toggle/publish/{videoId}",
        web::patch().to(videos::toggle_publish),
    )
    .service(
        web::resource("/{videoId}")
            .route(web::get().to(videos::get_video))
            .route(web::patch().to(videos::update_video))
            .route(web::delete().to(videos::delete_video)),
    );
}

fn tweet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(tweets::create_tweet)))
        .route("/feed", web::get().to(tweets::tweet_feed))
        .route("/user/{userId}", web::get().to(tweets::user_tweets))
        .service(
            web::resource("/{tweetId}")
                .route(web::patch().to(tweets::update_tweet))
                .route(web::delete().to(tweets::delete_tweet)),
        );
}

fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/c/{commentId}")
            .route(web::patch().to(comments::update_comment))
            .route(web::delete().to(comments::delete_comment)),
    )
    .service(
        web::resource("/t/{tweetId}")
            .route(web::get().to(comments::tweet_comments))
            .route(web::post().to(comments::add_tweet_comment)),
    )
    .service(
        web::resource("/{videoId}")
            .route(web::get().to(comments::video_comments))
            .route(web::post().to(comments::add_video_comment)),
    );
}

fn like_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/toggle/v/{videoId}", web::post().to(likes::toggle_video_like))
        .route("/toggle/c/{commentId}", web::post().to(likes::toggle_comment_like))
        .route("/toggle/t/{tweetId}", web::post().to(likes::toggle_tweet_like))
        .route("/videos", web::get().to(likes::liked_videos));
}

fn playlist_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(playlists::create_playlist)))
        .route("/user/{userId}", web::get().to(playlists::user_playlists))
        .route(
            "/add/{videoId}/{playlistId}",
            web::patch().to(playlists::add_video),
        )
        .route(
            "/remove/{videoId}/{playlistId}",
            web::patch().to(playlists::remove_video),
        )
        .service(
            web::resource("/{playlistId}")
                .route(web::get().to(playlists::get_playlist))
                .route(web::patch().to(playlists::update_playlist))
                .route(web::delete().to(playlists::delete_playlist)),
        );
}

fn subscription_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/c/{channelId}")
            .route(web::post().to(subscriptions::toggle_subscription))
            .route(web::get().to(subscriptions::channel_subscribers)),
    )
    .route(
        "/u/{subscriberId}",
        web::get().to(subscriptions::subscribed_channels),
    );
}

fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(dashboard::channel_stats))
        .route("/videos", web::get().to(dashboard::channel_videos));
}

// Extractor failures go through the same failure envelope as handler errors

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req: &HttpRequest| {
            AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid path: {}", err)).into()
    })
}

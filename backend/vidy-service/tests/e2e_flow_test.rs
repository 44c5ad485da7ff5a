//! End-to-end flows against a real PostgreSQL in Docker.
//!
//! Run with `cargo test -p vidy-service --test e2e_flow_test -- --ignored`.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::{local_media, migrated_pool, multipart_body, multipart_content_type, start_postgres, Part};
use vidy_service::middleware::AuthRateLimiter;
use vidy_service::{AppState, Config};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";
const MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

fn limiter() -> AuthRateLimiter {
    AuthRateLimiter::per_minute(1_000)
}

fn register_body(username: &str) -> Vec<u8> {
    let email = format!("{}@vidy.dev", username);
    multipart_body(&[
        Part::Text("fullName", "Test User"),
        Part::Text("email", &email),
        Part::Text("username", username),
        Part::Text("password", "correct-horse-battery"),
        Part::File {
            name: "avatar",
            filename: "avatar.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ])
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn account_lifecycle() {
    let (_pg, url) = start_postgres().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(migrated_pool(&url).await, local_media(&dir).await, Config::for_tests());
    let app = vidy_app!(state, limiter());

    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .insert_header(("Content-Type", multipart_content_type()))
        .set_payload(register_body("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("refreshToken").is_none());

    // same username again
    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .insert_header(("Content-Type", multipart_content_type()))
        .set_payload(register_body("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(serde_json::json!({ "username": "alice", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(serde_json::json!({ "email": "nobody@vidy.dev", "password": "whatever123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(serde_json::json!({ "email": "ALICE@vidy.dev", "password": "correct-horse-battery" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .response()
        .cookies()
        .any(|c| c.name() == "accessToken" && c.http_only() == Some(true)));
    let body: Value = test::read_body_json(resp).await;
    let access = body["data"]["accessToken"].as_str().expect("access token").to_string();
    let refresh = body["data"]["refreshToken"].as_str().expect("refresh token").to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/users/current-user")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // refresh rotates, so the old refresh token stops working
    let req = test::TestRequest::post()
        .uri("/api/v1/users/refresh-token")
        .set_json(serde_json::json!({ "refreshToken": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/refresh-token")
        .set_json(serde_json::json!({ "refreshToken": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/users/change-password")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .set_json(serde_json::json!({ "oldPassword": "nope-nope", "newPassword": "another-secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn channel_activity_flow() {
    let (_pg, url) = start_postgres().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(migrated_pool(&url).await, local_media(&dir).await, Config::for_tests());
    let jwt = state.jwt.clone();
    let app = vidy_app!(state, limiter());

    let mut ids = Vec::new();
    for username in ["creator", "viewer"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/users/register")
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(register_body(username))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id: uuid::Uuid = body["data"]["_id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("user id");
        ids.push(id);
    }
    let auth = |id: uuid::Uuid| {
        let token = jwt
            .issue(vidy_service::security::TokenType::Access, id, "x@vidy.dev", "x")
            .expect("token");
        format!("Bearer {}", token)
    };
    let (creator, viewer) = (auth(ids[0]), auth(ids[1]));

    // publish
    let upload = multipart_body(&[
        Part::Text("title", "Rust in ten minutes"),
        Part::Text("description", "Ownership, quickly"),
        Part::Text("duration", "600"),
        Part::File {
            name: "videoFile",
            filename: "clip.mp4",
            content_type: "video/mp4",
            bytes: MP4,
        },
        Part::File {
            name: "thumbnail",
            filename: "thumb.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ]);
    let req = test::TestRequest::post()
        .uri("/api/v1/videos")
        .insert_header(("Authorization", creator.clone()))
        .insert_header(("Content-Type", multipart_content_type()))
        .set_payload(upload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let video_id = body["data"]["_id"].as_str().expect("video id").to_string();

    // viewer watches and likes
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/videos/{}", video_id))
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["owner"]["username"], "creator");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/likes/toggle/v/{}", video_id))
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["liked"], true);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/history")
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["_id"], video_id.as_str());

    // non-owner cannot edit
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/videos/toggle/publish/{}", video_id))
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // comment
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/comments/{}", video_id))
        .insert_header(("Authorization", viewer.clone()))
        .set_json(serde_json::json!({ "content": "great intro" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments/{}?page=1&limit=5", video_id))
        .insert_header(("Authorization", creator.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(body["data"][0]["owner"]["username"], "viewer");

    // playlist
    let req = test::TestRequest::post()
        .uri("/api/v1/playlist")
        .insert_header(("Authorization", viewer.clone()))
        .set_json(serde_json::json!({ "name": "Learning", "description": "later" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let playlist_id = body["data"]["_id"].as_str().expect("playlist id").to_string();

    let add_uri = format!("/api/v1/playlist/add/{}/{}", video_id, playlist_id);
    let req = test::TestRequest::patch()
        .uri(&add_uri)
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&add_uri)
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/playlist/{}", playlist_id))
        .insert_header(("Authorization", creator.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalVideos"], 1);

    // subscription
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/subscriptions/c/{}", ids[0]))
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["subscribed"], true);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/c/creator")
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["subscribersCount"], 1);
    assert_eq!(body["data"]["isSubscribed"], true);

    // dashboard
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/stats")
        .insert_header(("Authorization", creator.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"],
        serde_json::json!({
            "totalVideos": 1,
            "totalViews": 1,
            "totalSubscribers": 1,
            "totalLikes": 1
        })
    );

    // unpublished videos disappear for everyone but the owner
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/videos/toggle/publish/{}", video_id))
        .insert_header(("Authorization", creator.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/videos/{}", video_id))
        .insert_header(("Authorization", viewer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/videos?query=rust")
        .insert_header(("Authorization", viewer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/videos")
        .insert_header(("Authorization", creator))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["isPublished"], false);
}

/// Send a request and read the envelope back
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn upload_body(title: &str, duration: &str) -> Vec<u8> {
    multipart_body(&[
        Part::Text("title", title),
        Part::Text("description", "demo"),
        Part::Text("duration", duration),
        Part::File {
            name: "videoFile",
            filename: "clip.mp4",
            content_type: "video/mp4",
            bytes: MP4,
        },
        Part::File {
            name: "thumbnail",
            filename: "thumb.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ])
}

fn stored_on_disk(dir: &tempfile::TempDir, url: &str) -> bool {
    let config = media_store::MediaConfig::default();
    config
        .key_from_url(url)
        .map(|key| dir.path().join(key).exists())
        .unwrap_or(false)
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn password_whitespace_survives_login() {
    let (_pg, url) = start_postgres().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(migrated_pool(&url).await, local_media(&dir).await, Config::for_tests());
    let app = vidy_app!(state, limiter());

    let padded = "  spaced-out-secret  ";
    let body = multipart_body(&[
        Part::Text("fullName", "Padded User"),
        Part::Text("email", "padded@vidy.dev"),
        Part::Text("username", "padded"),
        Part::Text("password", padded),
        Part::File {
            name: "avatar",
            filename: "avatar.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ]);
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/register")
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(body)
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(serde_json::json!({ "username": "padded", "password": padded }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(serde_json::json!({ "username": "padded", "password": padded.trim() }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // over-long profile fields are a client error, not a database failure
    let body = multipart_body(&[
        Part::Text("fullName", &"n".repeat(256)),
        Part::Text("email", "long@vidy.dev"),
        Part::Text("username", "longname"),
        Part::Text("password", "correct-horse-battery"),
        Part::File {
            name: "avatar",
            filename: "avatar.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ]);
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/register")
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn tweets_and_social_edges() {
    let (_pg, url) = start_postgres().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(migrated_pool(&url).await, local_media(&dir).await, Config::for_tests());
    let jwt = state.jwt.clone();
    let app = vidy_app!(state, limiter());

    let mut ids = Vec::new();
    for username in ["author", "reader"] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/users/register")
                .insert_header(("Content-Type", multipart_content_type()))
                .set_payload(register_body(username))
        );
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["_id"].as_str().expect("user id").to_string());
    }
    let auth = |id: &str| {
        let token = jwt
            .issue(
                vidy_service::security::TokenType::Access,
                id.parse().expect("uuid"),
                "x@vidy.dev",
                "x",
            )
            .expect("token");
        format!("Bearer {}", token)
    };
    let (author, reader) = (auth(&ids[0]), auth(&ids[1]));

    // tweet lifecycle with counters
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/tweets")
            .insert_header(("Authorization", author.clone()))
            .set_json(serde_json::json!({ "content": "first post" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let tweet_id = body["data"]["_id"].as_str().expect("tweet id").to_string();

    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/likes/toggle/t/{}", tweet_id))
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"]["liked"], true);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/comments/t/{}", tweet_id))
            .insert_header(("Authorization", reader.clone()))
            .set_json(serde_json::json!({ "content": "nice" }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/comments/t/{}", tweet_id))
            .insert_header(("Authorization", author.clone()))
    );
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(body["data"][0]["content"], "nice");

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/tweets/feed")
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"][0]["_id"], tweet_id.as_str());
    assert_eq!(body["data"][0]["commentsCount"], 1);
    assert_eq!(body["data"][0]["likesCount"], 1);
    assert_eq!(body["data"][0]["isLiked"], true);
    assert_eq!(body["data"][0]["owner"]["username"], "author");

    // second toggle un-likes
    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/likes/toggle/t/{}", tweet_id))
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"]["liked"], false);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/tweets/user/{}", ids[0]))
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"][0]["likesCount"], 0);
    assert_eq!(body["data"][0]["isLiked"], false);

    let tweet_uri = format!("/api/v1/tweets/{}", tweet_id);
    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&tweet_uri)
            .insert_header(("Authorization", reader.clone()))
            .set_json(serde_json::json!({ "content": "hijacked" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::patch()
            .uri(&tweet_uri)
            .insert_header(("Authorization", author.clone()))
            .set_json(serde_json::json!({ "content": "edited post" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], "edited post");

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&tweet_uri)
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&tweet_uri)
            .insert_header(("Authorization", author.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/tweets/feed")
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));

    // subscription lists and unsubscribe
    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/subscriptions/c/{}", ids[0]))
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"]["subscribed"], true);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/subscriptions/c/{}", ids[0]))
            .insert_header(("Authorization", author.clone()))
    );
    assert_eq!(body["data"]["totalSubscribers"], 1);
    assert_eq!(body["data"]["subscribers"][0]["username"], "reader");

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/subscriptions/u/{}", ids[1]))
            .insert_header(("Authorization", author.clone()))
    );
    assert_eq!(body["data"]["totalChannels"], 1);
    assert_eq!(body["data"]["channels"][0]["username"], "author");

    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/subscriptions/c/{}", ids[0]))
            .insert_header(("Authorization", reader.clone()))
    );
    assert_eq!(body["data"]["subscribed"], false);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/subscriptions/c/{}", ids[0]))
            .insert_header(("Authorization", reader))
    );
    assert_eq!(body["data"]["totalSubscribers"], 0);
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn video_management_edges() {
    let (_pg, url) = start_postgres().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(migrated_pool(&url).await, local_media(&dir).await, Config::for_tests());
    let jwt = state.jwt.clone();
    let app = vidy_app!(state, limiter());

    let mut ids = Vec::new();
    for username in ["studio", "guest"] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/users/register")
                .insert_header(("Content-Type", multipart_content_type()))
                .set_payload(register_body(username))
        );
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["_id"].as_str().expect("user id").to_string());
    }
    let auth = |id: &str| {
        let token = jwt
            .issue(
                vidy_service::security::TokenType::Access,
                id.parse().expect("uuid"),
                "x@vidy.dev",
                "x",
            )
            .expect("token");
        format!("Bearer {}", token)
    };
    let (studio, guest) = (auth(&ids[0]), auth(&ids[1]));

    let mut videos = Vec::new();
    for (title, duration) in [("Charlie", "20"), ("Alpha", "30"), ("Bravo", "10")] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/videos")
                .insert_header(("Authorization", studio.clone()))
                .insert_header(("Content-Type", multipart_content_type()))
                .set_payload(upload_body(title, duration))
        );
        assert_eq!(status, StatusCode::CREATED);
        videos.push(body["data"].clone());
    }
    let titles = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v["title"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    };

    // sorting and paging
    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/videos?sortBy=title&sortType=asc&limit=2&page=1")
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(titles(&body), vec!["Alpha", "Bravo"]);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/videos?sortBy=title&sortType=asc&limit=2&page=2")
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(titles(&body), vec!["Charlie"]);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/videos?sortBy=duration&sortType=desc")
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(titles(&body), vec!["Alpha", "Charlie", "Bravo"]);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/videos?userId={}&sortBy=nonsense", ids[0]))
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(titles(&body), vec!["Bravo", "Alpha", "Charlie"]);

    // over-long title is rejected before anything is stored
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/videos")
            .insert_header(("Authorization", studio.clone()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(upload_body(&"t".repeat(256), "5"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // edits are owner only and replace the thumbnail object
    let video_id = videos[0]["_id"].as_str().expect("id").to_string();
    let old_thumbnail = videos[0]["thumbnail"].as_str().expect("thumbnail").to_string();
    let video_file = videos[0]["videoFile"].as_str().expect("file").to_string();
    assert!(stored_on_disk(&dir, &old_thumbnail));

    let edit = || {
        multipart_body(&[
            Part::Text("title", "Charlie, remastered"),
            Part::File {
                name: "thumbnail",
                filename: "new.png",
                content_type: "image/png",
                bytes: PNG,
            },
        ])
    };
    let video_uri = format!("/api/v1/videos/{}", video_id);
    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&video_uri)
            .insert_header(("Authorization", guest.clone()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(edit())
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::patch()
            .uri(&video_uri)
            .insert_header(("Authorization", studio.clone()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(edit())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Charlie, remastered");
    let new_thumbnail = body["data"]["thumbnail"].as_str().expect("thumbnail").to_string();
    assert_ne!(new_thumbnail, old_thumbnail);
    assert!(stored_on_disk(&dir, &new_thumbnail));
    assert!(!stored_on_disk(&dir, &old_thumbnail));

    // playlist removal of an absent video
    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/playlist")
            .insert_header(("Authorization", guest.clone()))
            .set_json(serde_json::json!({ "name": "Queue", "description": "" }))
    );
    let playlist_id = body["data"]["_id"].as_str().expect("playlist id").to_string();
    let remove_uri = format!("/api/v1/playlist/remove/{}/{}", video_id, playlist_id);

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&remove_uri)
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/playlist/add/{}/{}", video_id, playlist_id))
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&remove_uri)
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    // likes respect publish state
    let hidden_id = videos[1]["_id"].as_str().expect("id").to_string();
    let (status, _) = send!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/videos/toggle/publish/{}", hidden_id))
            .insert_header(("Authorization", studio.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    let like_uri = format!("/api/v1/likes/toggle/v/{}", hidden_id);
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&like_uri)
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&like_uri)
            .insert_header(("Authorization", studio.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], true);

    // deletion is owner only and discards both objects
    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&video_uri)
            .insert_header(("Authorization", guest.clone()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&video_uri)
            .insert_header(("Authorization", studio.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(!stored_on_disk(&dir, &video_file));
    assert!(!stored_on_disk(&dir, &new_thumbnail));

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri(&video_uri)
            .insert_header(("Authorization", guest))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

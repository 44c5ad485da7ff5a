use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use media_store::MediaConfig;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidy_service::middleware::{AuthRateLimiter, MetricsMiddleware};
use vidy_service::openapi::ApiDoc;
use vidy_service::{db, routes, AppState, Config};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable ({}); waiting for Ctrl+C", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Container healthcheck: `vidy-service healthcheck` probes the local liveness endpoint
async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("VIDY_PORT").unwrap_or_else(|_| "8000".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/healthcheck", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

/// Vidy Service
///
/// REST backend for the Vidy video-sharing platform.
///
/// # Routes
///
/// - `/api/v1/users/*` - Accounts, sessions, profiles, watch history
/// - `/api/v1/videos/*` - Upload, listing, playback, publishing
/// - `/api/v1/tweets/*`, `/api/v1/comments/*`, `/api/v1/likes/*`
/// - `/api/v1/playlist/*`, `/api/v1/subscriptions/*`, `/api/v1/dashboard/*`
/// - `/metrics`, `/api/v1/openapi.json`, `/swagger-ui/`
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return run_healthcheck().await.context("healthcheck failed");
    }

    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting vidy-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    tracing::info!(
        max_connections = config.database.max_connections,
        "Connected to PostgreSQL"
    );

    if config.database.run_migrations {
        db::run_migrations(&db_pool)
            .await
            .context("Database migrations failed")?;
        tracing::info!("Database migrations applied");
    }

    let media_config = MediaConfig::from_env().map_err(anyhow::Error::msg)?;
    let media = media_store::connect(media_config)
        .await
        .context("Failed to initialize media store")?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let allowed_origins: Vec<String> = config.cors.origins().map(str::to_owned).collect();
    let limiter = AuthRateLimiter::from_config(&config.rate_limit);
    let state = web::Data::new(AppState::new(db_pool, media, config));

    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &allowed_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .supports_credentials()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let limiter = limiter.clone();

        App::new()
            .app_data(state.clone())
            .wrap(MetricsMiddleware)
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .service(ApiDoc::swagger_ui())
            .route(
                "/metrics",
                web::get().to(vidy_service::metrics::serve_metrics),
            )
            .configure(|cfg| routes::configure(cfg, limiter))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .shutdown_timeout(30)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            return match result {
                Ok(result) => result.context("HTTP server exited"),
                Err(e) => Err(anyhow::anyhow!("HTTP server task failed: {}", e)),
            };
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    server_handle.stop(true).await;
    match server_task.await {
        Ok(result) => result.context("HTTP server exited")?,
        Err(e) => tracing::error!("HTTP server task failed: {}", e),
    }

    tracing::info!("vidy-service shut down");
    Ok(())
}

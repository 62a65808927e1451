//! Atrium Portal Server — agency admin/client portal backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use atrium_core::config::AppConfig;
use atrium_core::error::AppError;
use atrium_database::repositories::{ActivityLogRepository, ProfileRepository, SyncRepository};
use atrium_realtime::feed::reconciler::ACTIVITY_TABLE;
use atrium_realtime::store::{ActivityStore, ProfileStore};
use atrium_realtime::transport::EventFilter;
use atrium_realtime::{ActivityFeed, FeedScope, LocalTransport, PresenceTracker, RealtimeTransport};
use atrium_sync::github::client::GithubClient;
use atrium_sync::{GithubSyncService, SyncRequest};

#[tokio::main]
async fn main() {
    let env = std::env::var("ATRIUM_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Shared application state for the HTTP surface.
#[derive(Clone)]
struct AppState {
    transport: Arc<LocalTransport>,
    tracker: Arc<PresenceTracker>,
    global_feed: Arc<ActivityFeed>,
    activities: Arc<dyn ActivityStore>,
    profiles: Arc<dyn ProfileStore>,
    sync: Arc<GithubSyncService>,
    config: Arc<AppConfig>,
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Atrium Portal v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = atrium_database::DatabasePool::connect(&config.database).await?;
    db.migrate().await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let activities: Arc<dyn ActivityStore> =
        Arc::new(ActivityLogRepository::new(db.pool().clone()));
    let profiles: Arc<dyn ProfileStore> = Arc::new(ProfileRepository::new(db.pool().clone()));
    let sync_repo = Arc::new(SyncRepository::new(db.pool().clone()));

    // ── Step 3: Realtime transport + presence tracker ────────────
    let transport = Arc::new(LocalTransport::new(config.realtime.event_buffer_size));
    let tracker = Arc::new(PresenceTracker::new(
        Arc::clone(&transport) as Arc<dyn RealtimeTransport>,
        config.realtime.presence_channel.clone(),
    ));
    let server_identity = Uuid::new_v4();
    if let Err(e) = Arc::clone(&tracker).start(server_identity).await {
        tracing::warn!(error = %e, "presence tracker failed to start; continuing with stale state");
    }

    // ── Step 4: Global activity feed ─────────────────────────────
    let global_feed = Arc::new(ActivityFeed::new(
        Arc::clone(&activities),
        Arc::clone(&profiles),
        FeedScope::Global,
        &config.feed,
    ));
    let feed_subscription = transport
        .subscribe(
            &config.realtime.changes_channel,
            vec![EventFilter::Insert {
                table: ACTIVITY_TABLE.to_string(),
            }],
        )
        .await?;
    let feed_runner = Arc::clone(&global_feed);
    tokio::spawn(async move {
        feed_runner.run(feed_subscription).await;
    });

    // ── Step 5: GitHub sync collaborator ─────────────────────────
    let sync = Arc::new(GithubSyncService::new(
        GithubClient::new(&config.github)?,
        sync_repo,
    ));

    // ── Step 6: HTTP server + graceful shutdown ──────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let state = AppState {
        transport: Arc::clone(&transport),
        tracker: Arc::clone(&tracker),
        global_feed,
        activities,
        profiles,
        sync,
        config: Arc::new(config.clone()),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/presence", get(presence))
        .route("/api/feed", get(global_feed_handler))
        .route("/api/feed/{department}", get(department_feed_handler))
        .route("/api/sync", post(sync_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Atrium Portal listening on {}", addr);

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    // Drain in-flight connections, but never for longer than the
    // configured grace window.
    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "shutdown grace period elapsed, forcing exit");
        }
    }

    tracker.stop().await;
    db.close().await;
    tracing::info!("Atrium Portal shut down gracefully");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn presence(State(state): State<AppState>) -> Json<serde_json::Value> {
    let online = state.tracker.online_users();
    Json(serde_json::json!({
        "count": online.len(),
        "online": online,
    }))
}

async fn global_feed_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "loading": state.global_feed.is_loading(),
        "entries": state.global_feed.entries(),
    }))
}

/// Department feeds are built per request; each refresh publishes a full
/// snapshot, so a one-shot reconciler is equivalent to a resident one.
async fn department_feed_handler(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> Json<serde_json::Value> {
    let feed = ActivityFeed::new(
        Arc::clone(&state.activities),
        Arc::clone(&state.profiles),
        FeedScope::Department(department),
        &state.config.feed,
    );
    feed.refresh().await;
    Json(serde_json::json!({ "entries": feed.entries() }))
}

/// Caller identity comes from the authenticated session; the auth layer
/// in front of this service injects it as a header.
async fn sync_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SyncRequest>,
) -> Response {
    let caller = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok());

    match state.sync.handle(caller, request).await {
        Ok(outcome) => {
            // Commit syncs show up in the feed on the next insert signal.
            let _ = state
                .transport
                .publish_insert(&state.config.realtime.changes_channel, ACTIVITY_TABLE)
                .await;
            Json(outcome).into_response()
        }
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(serde_json::json!({ "error": e.message }))).into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

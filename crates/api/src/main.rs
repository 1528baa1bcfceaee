use std::net::SocketAddr;
use std::sync::Arc;

use lagar_core::jobs::SeedMode;
use lagar_events::{ActivityLog, EventBroadcaster, PushDelivery};
use lagar_pipeline::{JobController, PgJobStore};
use lagar_seeder::{LagarSeeder, SeedConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lagar_api::config::ServerConfig;
use lagar_api::router::build_app_router;
use lagar_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lagar_api=debug,lagar=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        seed_mode = config.seed_mode.as_str(),
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lagar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    lagar_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    lagar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Activity log ---
    let broadcaster = Arc::new(EventBroadcaster::new());
    let push = config
        .push_url
        .as_deref()
        .and_then(|url| PushDelivery::new(url).expect("PUSH_URL must be a valid URL"));
    if config.push_url.is_some() && push.is_none() {
        tracing::info!("PUSH_URL targets a loopback host, log push disabled");
    }
    let log = ActivityLog::standard(Arc::clone(&broadcaster), push);

    // --- Seed controller ---
    let controller = match config.seed_mode {
        SeedMode::Inline => {
            let seeder = LagarSeeder::new(pool.clone(), SeedConfig::from_env());
            JobController::inline(Arc::new(seeder), log.clone())
        }
        SeedMode::Queued => {
            let store = PgJobStore::new(pool.clone());
            JobController::queued(Arc::new(store), log.clone())
        }
    };

    // --- App state ---
    let config = Arc::new(config);
    let shutdown = CancellationToken::new();
    let state = AppState {
        pool,
        config: Arc::clone(&config),
        broadcaster,
        log: log.clone(),
        controller: Arc::new(controller),
        shutdown: shutdown.clone(),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");
    log.info(format!("Server running on port {}", config.port));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        shutdown.cancel();
    })
    .await
    .expect("Server error");

    tracing::info!("Server shut down");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

//! Seed worker: executes queued Lagar seed jobs.
//!
//! Polls `background_jobs` for PENDING seed jobs and runs each one to DONE or
//! FAILED. Stops between polls on SIGINT or SIGTERM; a running seed is
//! allowed to finish first.

mod config;

use std::sync::Arc;

use lagar_events::{ActivityLog, PushDelivery};
use lagar_pipeline::{PgJobStore, SeedWorker};
use lagar_seeder::{LagarSeeder, SeedConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::WorkerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lagar_worker=debug,lagar_pipeline=debug,lagar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    let seed_config = SeedConfig::from_env();
    tracing::info!(
        poll_interval_secs = config.poll_interval.as_secs(),
        stale_after_secs = config.stale_after.map(|d| d.as_secs()),
        clear_before_seeding = seed_config.clear_before_seeding,
        "Loaded worker configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lagar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    lagar_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    lagar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Activity log ---
    let push = config
        .push_url
        .as_deref()
        .and_then(|url| PushDelivery::new(url).expect("PUSH_URL must be a valid URL"));
    if config.push_url.is_some() && push.is_none() {
        tracing::info!("PUSH_URL targets a loopback host, log push disabled");
    }
    let log = ActivityLog::headless(push);

    // --- Worker ---
    let store = Arc::new(PgJobStore::new(pool.clone()));
    let seeder = Arc::new(LagarSeeder::new(pool, seed_config));
    let worker = SeedWorker::new(store, seeder, log)
        .with_poll_interval(config.poll_interval)
        .with_stale_after(config.stale_after);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    worker.run(cancel).await;
    tracing::info!("Worker stopped");
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
        () = ctrl_c => tracing::info!("Received SIGINT, stopping after the current poll"),
        () = terminate => tracing::info!("Received SIGTERM, stopping after the current poll"),
    }
}

//! `quotas-worker` -- scheduled resource-usage collection and publishing.
//!
//! Connects to Postgres, applies migrations, registers the built-in
//! plugins and runs every entry of `QUOTAS_SCHEDULE` on its interval
//! until interrupted.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default | Description                              |
//! |--------------------------|----------|---------|------------------------------------------|
//! | `DATABASE_URL`           | yes      | --      | Postgres connection string               |
//! | `DB_MAX_CONNECTIONS`     | no       | `5`     | Connection pool size                     |
//! | `QUOTAS_SCHEDULE`        | no       | `[]`    | JSON array of schedule entries           |
//! | `QUOTAS_PUBLISH_METRICS` | no       | `[]`    | JSON array of `{type, id, metric}`       |

use std::sync::Arc;

use quotas_worker::config::WorkerConfig;
use quotas_worker::jobs::JobContext;
use quotas_worker::plugins::{self, PluginRegistry};
use quotas_worker::scheduler::Scheduler;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotas_worker=info,quotas_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(
        schedule_entries = config.schedule.len(),
        publish_selectors = config.publish_selectors.len(),
        max_connections = config.max_connections,
        "Loaded worker configuration",
    );

    // --- Database ---
    let pool = quotas_db::create_pool(&config.database_url, config.max_connections)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        });

    if let Err(e) = quotas_db::health_check(&pool).await {
        tracing::error!(error = %e, "Database health check failed");
        std::process::exit(1);
    }

    if let Err(e) = quotas_db::run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run database migrations");
        std::process::exit(1);
    }
    tracing::info!("Database ready");

    // --- Plugins ---
    let mut registry = PluginRegistry::new();
    if let Err(e) = plugins::register_builtins(&mut registry, pool.clone()) {
        tracing::error!(error = %e, "Failed to register built-in plugins");
        std::process::exit(1);
    }
    tracing::info!(plugins = ?registry.paths(), "Plugins registered");

    for entry in &config.schedule {
        if registry.kind_of(&entry.plugin) != Some(entry.task.plugin_kind()) {
            tracing::warn!(
                entry = %entry.name,
                task = %entry.task,
                plugin = %entry.plugin,
                "Scheduled plugin is not registered for this task, every run will fail",
            );
        }
    }

    // --- Scheduler ---
    let ctx = Arc::new(JobContext::new(
        registry,
        Arc::new(pool),
        config.publish_selectors,
    ));
    let scheduler = Scheduler::new(ctx, config.schedule);
    tracing::info!(entries = scheduler.entries().len(), "Starting scheduler");

    let cancel = CancellationToken::new();
    let scheduler_handle = tokio::spawn(scheduler.run(cancel.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }

    cancel.cancel();
    if let Err(e) = scheduler_handle.await {
        tracing::error!(error = %e, "Scheduler task panicked");
    }

    tracing::info!("quotas-worker stopped");
}

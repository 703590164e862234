//! Rollcall: attendance administration console
//!
//! Main entry point that wires all crates together and starts the console.

use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use rollcall_cli::{Cli, Console, Shell};
use rollcall_client::{
    ApiClient, AttendanceWorkflow, AuthWorkflow, BulkUploadWorkflow, PromotionWorkflow,
};
use rollcall_core::config::AppConfig;
use rollcall_core::error::AppError;
use rollcall_core::time::{Clock, SharedClock, SystemClock};
use rollcall_notify::activity::ActivityMonitor;
use rollcall_notify::persistence::JsonFilePersistence;
use rollcall_notify::{NotificationService, NotificationStore, SharedStore, ToastManager};
use rollcall_worker::BackgroundRunner;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| AppError::configuration(format!("Config load error: {}", e)))?;
    Ok(config)
}

/// Initialize tracing/logging
///
/// Logs go to stderr so they never interleave with command output.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Main console run function
async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Rollcall v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Notification store ───────────────────────────────
    let clock: SharedClock = Arc::new(SystemClock);
    let storage_path = config.notifications.storage_path();
    tracing::info!("Notification storage at '{}'", storage_path.display());
    let persistence = Arc::new(JsonFilePersistence::new(storage_path));
    let store = SharedStore::new(NotificationStore::hydrate(clock.clone(), persistence));

    // ── Step 2: Toasts and activity ──────────────────────────────
    let toasts = Arc::new(Mutex::new(ToastManager::watching(config.toast.clone(), &store)));
    let activity = Arc::new(Mutex::new(ActivityMonitor::from_config(&config.notifications)));

    // ── Step 3: API client and workflows ─────────────────────────
    tracing::info!("Using API at {}", config.api.base_url);
    let api = Arc::new(ApiClient::new(&config.api)?);
    let notifications = NotificationService::new(store.clone());
    let date = cli.date.unwrap_or_else(|| clock.now().date_naive());

    let console = Console {
        format: cli.format,
        clock: clock.clone(),
        store: store.clone(),
        notifications: notifications.clone(),
        toasts: toasts.clone(),
        activity: activity.clone(),
        auth: AuthWorkflow::new(api.clone()),
        attendance: AttendanceWorkflow::new(api.clone(), notifications.clone(), date),
        uploads: BulkUploadWorkflow::new(api.clone(), notifications.clone(), config.upload.clone()),
        promotions: PromotionWorkflow::new(api, notifications),
    };

    // ── Step 4: Background work ──────────────────────────────────
    let runner = BackgroundRunner::start(
        &config,
        store,
        toasts.clone(),
        activity,
        clock,
    )
    .await?;

    // ── Step 5: Interactive loop ─────────────────────────────────
    let mut shell = Shell::new(console);
    let result = shell.run().await;

    // ── Step 6: Shutdown ─────────────────────────────────────────
    tracing::info!("Shutting down background tasks...");
    runner.shutdown().await?;
    toasts.lock().unwrap_or_else(|e| e.into_inner()).unmount();

    tracing::info!("Rollcall console closed");
    result
}

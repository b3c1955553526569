//! PromoHub Server — promotion asset hierarchy service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use promohub_core::config::AppConfig;
use promohub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("PROMOHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PromoHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = Arc::new(promohub_database::connection::DatabasePool::connect(&config.database).await?);
    promohub_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.pool().clone();

    // ── Step 2: Blob store ───────────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing blob store");
    let blob_store = promohub_storage::create_blob_store(&config.storage).await?;

    // ── Step 3: Store and repositories ───────────────────────────
    let node_store: Arc<dyn promohub_core::traits::NodeStore> = Arc::new(
        promohub_database::stores::PgNodeStore::new(db_pool.clone()),
    );
    let site_repo = Arc::new(promohub_database::repositories::SiteRepository::new(
        db_pool.clone(),
    ));
    let auth_user_repo = Arc::new(promohub_database::repositories::AuthUserRepository::new(
        db_pool.clone(),
    ));

    // ── Step 4: Services ─────────────────────────────────────────
    let node_service = Arc::new(promohub_service::NodeService::new(Arc::clone(&node_store)));
    let upload_service = Arc::new(promohub_service::UploadService::new(
        Arc::clone(&node_store),
        Arc::clone(&node_service),
        Arc::clone(&blob_store),
        config.storage.clone(),
    ));
    let archive_service = Arc::new(promohub_service::ArchiveService::new(
        Arc::clone(&node_store),
        Arc::clone(&blob_store),
    ));
    let site_service = Arc::new(promohub_service::SiteService::new(Arc::clone(&site_repo)));
    let auth_user_service = Arc::new(promohub_service::AuthUserService::new(Arc::clone(
        &auth_user_repo,
    )));
    tracing::info!("Services initialized");

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app_state = promohub_api::AppState {
        config: Arc::new(config.clone()),
        db: Arc::clone(&db),
        node_service,
        upload_service,
        archive_service,
        site_service,
        auth_user_service,
    };

    let app = promohub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("PromoHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("PromoHub server shut down gracefully");
    Ok(())
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

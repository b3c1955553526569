//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use promohub_core::config::AppConfig;
use promohub_database::connection::DatabasePool;
use promohub_service::{
    ArchiveService, AuthUserService, NodeService, SiteService, UploadService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, probed by the health endpoint.
    pub db: Arc<DatabasePool>,
    /// Node hierarchy engine.
    pub node_service: Arc<NodeService>,
    /// Upload workflow.
    pub upload_service: Arc<UploadService>,
    /// Archive exporter.
    pub archive_service: Arc<ArchiveService>,
    /// Bookmark sites.
    pub site_service: Arc<SiteService>,
    /// Authorized-user listing.
    pub auth_user_service: Arc<AuthUserService>,
}

//! IntraExtra API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use intraextra_application::{AccessPolicy, LayoutRepository, LayoutService};
use intraextra_core::AppError;
use intraextra_domain::GridOptions;
use intraextra_infrastructure::{
    FallbackLayoutRepository, FileLayoutRepository, HttpLayoutRepository,
};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let layout_repository = build_layout_repository(&config)?;

    let app_state = AppState {
        layout_service: LayoutService::new(layout_repository, GridOptions::default()),
        access_policy: AccessPolicy::default(),
        frontend_url: config.frontend_url.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "intraextra-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn build_layout_repository(config: &ApiConfig) -> Result<Arc<dyn LayoutRepository>, AppError> {
    let local: Arc<dyn LayoutRepository> =
        Arc::new(FileLayoutRepository::per_user(config.layout_storage_dir.clone()));

    let Some(remote_url) = config.layout_remote_url.as_deref() else {
        info!(
            directory = %config.layout_storage_dir.display(),
            "layouts persisted to local directory"
        );
        return Ok(local);
    };

    let http_client = reqwest::Client::builder()
        .timeout(config.layout_remote_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;
    let remote = Arc::new(HttpLayoutRepository::new(http_client, remote_url)?);

    info!(%remote_url, "layouts persisted to remote API with local fallback");
    Ok(Arc::new(FallbackLayoutRepository::new(remote, local)))
}

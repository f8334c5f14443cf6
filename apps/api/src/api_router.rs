use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use intraextra_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{USER_ID_HEADER, USER_NAME_HEADER, USER_ROLE_HEADER};
use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    // Storage endpoints are also called server-to-server by remote layout
    // stores, which send the user header but no Origin.
    let storage_routes = Router::new()
        .route(
            "/api/layouts/{page_id}",
            get(handlers::layouts::get_layout_handler)
                .post(handlers::layouts::save_layout_handler)
                .delete(handlers::layouts::delete_layout_handler),
        )
        .route_layer(from_fn(middleware::require_identity));

    let protected_routes = Router::new()
        .route(
            "/api/layouts/import",
            post(handlers::layouts::import_layout_handler),
        )
        .route(
            "/api/layouts/{page_id}/export",
            get(handlers::layouts::export_layout_handler),
        )
        .route("/api/access/me", get(handlers::access::access_profile_handler))
        .route(
            "/api/access/evaluate",
            post(handlers::access::evaluate_access_handler),
        )
        .route(
            "/api/access/sections/filter",
            post(handlers::access::filter_sections_handler),
        )
        .route("/api/access/mask", post(handlers::access::mask_value_handler))
        .route_layer(from_fn(middleware::require_identity))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderName::from_static(USER_NAME_HEADER),
        ]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(storage_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;

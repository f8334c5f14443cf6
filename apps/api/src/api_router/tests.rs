use std::sync::Arc;

use axum::http::StatusCode;
use intraextra_application::{
    AccessPolicy, LayoutDocument, LayoutRepository, LayoutScope, LayoutService,
};
use intraextra_core::PageId;
use intraextra_domain::{GridDimensions, GridOptions, default_sections};
use intraextra_infrastructure::{FileLayoutRepository, HttpLayoutRepository};
use serde_json::Value;

use crate::state::AppState;

use super::build_router;

const FRONTEND_URL: &str = "http://localhost:3000";

async fn spawn_api(storage: &tempfile::TempDir) -> String {
    let app_state = AppState {
        layout_service: LayoutService::new(
            Arc::new(FileLayoutRepository::per_user(storage.path())),
            GridOptions::default(),
        ),
        access_policy: AccessPolicy::default(),
        frontend_url: FRONTEND_URL.to_owned(),
    };
    let router = build_router(app_state, FRONTEND_URL).unwrap_or_else(|_| unreachable!());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{address}")
}

fn storage() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn health_reports_ok() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;

    let response = reqwest::get(format!("{base_url}/health"))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap_or_default();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn remote_repository_round_trips_through_the_api() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;
    let repository = HttpLayoutRepository::new(reqwest::Client::new(), &base_url)
        .unwrap_or_else(|_| unreachable!());
    let scope = LayoutScope::new(
        PageId::new("crew-management").unwrap_or_else(|_| unreachable!()),
        Some("u-21".to_owned()),
    );

    assert!(matches!(repository.find_layout(&scope).await, Ok(None)));

    let document = LayoutDocument::saved(
        scope.page_id.clone(),
        default_sections("crew-management").unwrap_or_default(),
        GridDimensions::new(50, 30),
    );
    assert!(repository.save_layout(&scope, document.clone()).await.is_ok());

    let found = repository.find_layout(&scope).await.unwrap_or_default();
    assert!(found.is_some_and(|found| found.same_layout(&document)));

    assert!(repository.delete_layout(&scope).await.is_ok());
    assert!(matches!(repository.find_layout(&scope).await, Ok(None)));
}

#[tokio::test]
async fn access_routes_require_an_identity() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;

    let response = reqwest::get(format!("{base_url}/api/access/me"))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = reqwest::Client::new()
        .get(format!("{base_url}/api/access/me"))
        .header("x-user-id", "u-5")
        .header("x-user-role", "HR_Finance")
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap_or_default();
    assert_eq!(body["role"], "HR_Finance");
    assert_eq!(body["can_view_financials"], true);
    assert_eq!(body["can_edit_financials"], false);
}

#[tokio::test]
async fn session_mutations_must_come_from_the_frontend() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "module": "logistics",
        "section": "shipments",
        "action": "edit",
    });

    let blocked = client
        .post(format!("{base_url}/api/access/evaluate"))
        .header("x-user-id", "u-5")
        .header("x-user-role", "Mid")
        .header("origin", "https://elsewhere.example")
        .json(&payload)
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(blocked.status(), StatusCode::UNAUTHORIZED);

    let allowed = client
        .post(format!("{base_url}/api/access/evaluate"))
        .header("x-user-id", "u-5")
        .header("x-user-role", "Mid")
        .header("origin", FRONTEND_URL)
        .json(&payload)
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(allowed.status(), StatusCode::OK);
    let body = allowed.json::<Value>().await.unwrap_or_default();
    assert_eq!(body["allowed"], true);
}

#[tokio::test]
async fn invalid_page_ids_are_rejected() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;

    let response = reqwest::Client::new()
        .get(format!("{base_url}/api/layouts/%20"))
        .header("x-user-id", "u-5")
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_routes_require_an_identity() {
    let storage = storage();
    let base_url = spawn_api(&storage).await;
    let client = reqwest::Client::new();

    let anonymous = client
        .get(format!("{base_url}/api/layouts/logistics?userId=u-21"))
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let impersonating = client
        .delete(format!("{base_url}/api/layouts/logistics?userId=u-21"))
        .header("x-user-id", "u-22")
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(impersonating.status(), StatusCode::FORBIDDEN);

    let anonymous_remote = HttpLayoutRepository::new(reqwest::Client::new(), &base_url)
        .unwrap_or_else(|_| unreachable!());
    let scope = LayoutScope::new(
        PageId::new("logistics").unwrap_or_else(|_| unreachable!()),
        None,
    );
    assert!(anonymous_remote.find_layout(&scope).await.is_err());
}

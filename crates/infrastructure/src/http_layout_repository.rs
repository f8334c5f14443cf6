use async_trait::async_trait;
use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
use intraextra_core::{AppError, AppResult};
use reqwest::{RequestBuilder, StatusCode};
use tracing::info;
use url::Url;

/// Header carrying the caller's user subject to the layouts API.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Remote layout store reached over the layouts HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLayoutRepository {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpLayoutRepository {
    /// Creates a repository for the API at `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid layout API url '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, scope: &LayoutScope, with_user_query: bool) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "layout API url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "layouts", scope.page_id.as_str()]);

        if with_user_query && let Some(user_subject) = &scope.user_subject {
            url.query_pairs_mut().append_pair("userId", user_subject);
        }

        Ok(url)
    }
}

fn with_identity(request: RequestBuilder, scope: &LayoutScope) -> RequestBuilder {
    match &scope.user_subject {
        Some(user_subject) => request.header(USER_ID_HEADER, user_subject),
        None => request,
    }
}

fn transport_error(action: &str, scope: &LayoutScope, error: reqwest::Error) -> AppError {
    AppError::Internal(format!(
        "layout API {action} for page '{}' failed: {error}",
        scope.page_id
    ))
}

fn status_error(action: &str, scope: &LayoutScope, status: StatusCode) -> AppError {
    AppError::Internal(format!(
        "layout API {action} for page '{}' returned status {status}",
        scope.page_id
    ))
}

#[async_trait]
impl LayoutRepository for HttpLayoutRepository {
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        let url = self.endpoint(scope, false)?;
        let document = document.with_user(scope.user_subject.clone());
        let response = with_identity(self.http_client.post(url), scope)
            .json(&document)
            .send()
            .await
            .map_err(|error| transport_error("save", scope, error))?;

        if !response.status().is_success() {
            return Err(status_error("save", scope, response.status()));
        }

        info!(page_id = %scope.page_id, "layout saved to API");
        Ok(())
    }

    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        let url = self.endpoint(scope, true)?;
        let response = with_identity(self.http_client.get(url), scope)
            .send()
            .await
            .map_err(|error| transport_error("load", scope, error))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error("load", scope, response.status()));
        }

        let document = response
            .json::<LayoutDocument>()
            .await
            .map_err(|error| transport_error("load", scope, error))?;

        info!(page_id = %scope.page_id, "layout loaded from API");
        Ok(Some(document))
    }

    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        let url = self.endpoint(scope, true)?;
        let response = with_identity(self.http_client.delete(url), scope)
            .send()
            .await
            .map_err(|error| transport_error("reset", scope, error))?;

        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(status_error("reset", scope, response.status()));
        }

        info!(page_id = %scope.page_id, "layout reset via API");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
    use intraextra_core::{AppError, PageId};
    use intraextra_domain::GridDimensions;
    use serde_json::Value;
    use tokio::sync::Mutex;

    use super::{HttpLayoutRepository, USER_ID_HEADER};

    type Store = Arc<Mutex<HashMap<String, Value>>>;

    async fn save(
        State(store): State<Store>,
        Path(page_id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let Some(user) = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        else {
            return StatusCode::UNAUTHORIZED;
        };
        if body.get("userId").and_then(Value::as_str) != Some(user) {
            return StatusCode::FORBIDDEN;
        }

        store.lock().await.insert(format!("{page_id}:{user}"), body);
        StatusCode::CREATED
    }

    async fn load(
        State(store): State<Store>,
        Path(page_id): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        let user = query.get("userId").cloned().unwrap_or_default();
        store
            .lock()
            .await
            .get(&format!("{page_id}:{user}"))
            .cloned()
            .map(Json)
            .ok_or(StatusCode::NOT_FOUND)
    }

    async fn remove(
        State(store): State<Store>,
        Path(page_id): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> StatusCode {
        let user = query.get("userId").cloned().unwrap_or_default();
        store.lock().await.remove(&format!("{page_id}:{user}"));
        StatusCode::NO_CONTENT
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| unreachable!());
        let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        format!("http://{address}")
    }

    fn scope() -> LayoutScope {
        LayoutScope::new(
            PageId::new("crew-management").unwrap_or_else(|_| unreachable!()),
            Some("user 42".to_owned()),
        )
    }

    #[tokio::test]
    async fn saves_loads_and_deletes_through_the_api() {
        let store: Store = Arc::default();
        let router = Router::new()
            .route("/api/layouts/{page_id}", get(load).post(save).delete(remove))
            .with_state(store.clone());
        let base_url = spawn_server(router).await;
        let repository = HttpLayoutRepository::new(reqwest::Client::new(), &base_url)
            .unwrap_or_else(|_| unreachable!());

        assert!(repository.find_layout(&scope()).await.unwrap_or_default().is_none());

        let document = LayoutDocument::saved(
            scope().page_id,
            Vec::new(),
            GridDimensions::new(40, 20),
        );
        assert!(repository.save_layout(&scope(), document).await.is_ok());
        assert!(store.lock().await.contains_key("crew-management:user 42"));

        let found = repository.find_layout(&scope()).await.unwrap_or_default();
        assert_eq!(
            found.as_ref().map(LayoutDocument::dimensions),
            Some(GridDimensions::new(40, 20))
        );
        assert_eq!(
            found.as_ref().and_then(LayoutDocument::user_id),
            Some("user 42")
        );

        assert!(repository.delete_layout(&scope()).await.is_ok());
        assert!(store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn server_errors_surface_as_internal() {
        let router = Router::new().route(
            "/api/layouts/{page_id}",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR })
                .post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base_url = spawn_server(router).await;
        let repository = HttpLayoutRepository::new(reqwest::Client::new(), &base_url)
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            repository.find_layout(&scope()).await,
            Err(AppError::Internal(_))
        ));
        let document =
            LayoutDocument::saved(scope().page_id, Vec::new(), GridDimensions::default());
        assert!(matches!(
            repository.save_layout(&scope(), document).await,
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn endpoint_appends_page_and_user() {
        let repository =
            HttpLayoutRepository::new(reqwest::Client::new(), "https://layouts.example.test/base/")
                .unwrap_or_else(|_| unreachable!());
        let url = repository
            .endpoint(&scope(), true)
            .map(|url| url.to_string())
            .unwrap_or_default();
        assert_eq!(
            url,
            "https://layouts.example.test/base/api/layouts/crew-management?userId=user+42"
        );
    }
}

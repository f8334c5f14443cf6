use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use intraextra_application::{LayoutDocument, LayoutScope};
use intraextra_core::{AppError, PageId, UserIdentity};
use tracing::info;

use crate::dto::{LayoutDeletedResponse, LayoutQuery};
use crate::error::ApiResult;
use crate::state::AppState;


fn layout_scope(page_id: String, user_subject: Option<String>) -> ApiResult<LayoutScope> {
    Ok(LayoutScope::new(PageId::new(page_id)?, user_subject))
}

/// Scopes a storage request to the caller. A `userId` naming anyone else is
/// rejected.
fn caller_scope<'a>(
    page_id: String,
    user: &UserIdentity,
    claimed: impl IntoIterator<Item = Option<&'a str>>,
) -> ApiResult<LayoutScope> {
    if let Some(other) = claimed
        .into_iter()
        .flatten()
        .find(|claimed| *claimed != user.subject())
    {
        return Err(AppError::Forbidden(format!(
            "layouts of user '{other}' cannot be accessed by '{}'",
            user.subject()
        ))
        .into());
    }

    layout_scope(page_id, Some(user.subject().to_owned()))
}

pub async fn get_layout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(page_id): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> ApiResult<Json<LayoutDocument>> {
    let scope = caller_scope(page_id, &user, [query.user_subject().as_deref()])?;
    let document = state
        .layout_service
        .find_layout(&scope)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no saved layout for page '{}'", scope.page_id)))?;

    Ok(Json(document))
}

pub async fn save_layout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(page_id): Path<String>,
    Query(query): Query<LayoutQuery>,
    Json(document): Json<LayoutDocument>,
) -> ApiResult<(StatusCode, Json<LayoutDocument>)> {
    let scope = caller_scope(
        page_id,
        &user,
        [query.user_subject().as_deref(), document.user_id()],
    )?;
    let document = document.with_user(scope.user_subject.clone());

    state
        .layout_service
        .save_layout(&scope, document.clone())
        .await?;

    info!(
        page_id = %scope.page_id,
        sections = document.sections().len(),
        "layout stored"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn delete_layout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(page_id): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> ApiResult<Json<LayoutDeletedResponse>> {
    let scope = caller_scope(page_id, &user, [query.user_subject().as_deref()])?;
    state.layout_service.clear_layout(&scope).await?;

    info!(page_id = %scope.page_id, "layout reset to default");
    Ok(Json(LayoutDeletedResponse {
        page_id: scope.page_id.as_str().to_owned(),
        user_id: scope.user_subject,
    }))
}

pub async fn export_layout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(page_id): Path<String>,
) -> ApiResult<(HeaderMap, Json<LayoutDocument>)> {
    let scope = layout_scope(page_id, Some(user.subject().to_owned()))?;
    let document = state.layout_service.export_layout(&scope).await?;

    let mut headers = HeaderMap::new();
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|error| {
            AppError::Internal(format!("invalid export file name '{disposition}': {error}"))
        })?,
    );

    info!(page_id = %scope.page_id, "layout exported");
    Ok((headers, Json(document)))
}

pub async fn import_layout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    body: String,
) -> ApiResult<(StatusCode, Json<LayoutDocument>)> {
    let document = state
        .layout_service
        .import_layout(Some(user.subject().to_owned()), &body)
        .await?;

    info!(page_id = %document.page_id(), "layout imported");
    Ok((StatusCode::CREATED, Json(document)))
}

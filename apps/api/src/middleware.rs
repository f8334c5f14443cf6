use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use intraextra_core::{AppError, UserIdentity};
pub use intraextra_infrastructure::USER_ID_HEADER;

use crate::error::ApiResult;
use crate::state::AppState;

pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";

pub async fn require_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = header_str(headers, header::ORIGIN.as_str()).unwrap_or_default();
        let referer = header_str(headers, header::REFERER.as_str()).unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Builds the caller identity from the session headers set by the front end.
///
/// The role header is passed through untouched; an absent or unrecognised
/// role is resolved to "no role" by the access layer.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let subject = header_str(headers, USER_ID_HEADER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let role_claim = header_str(headers, USER_ROLE_HEADER).unwrap_or_default();
    let display_name = header_str(headers, USER_NAME_HEADER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(subject);

    Ok(UserIdentity::new(subject, display_name, None, role_claim.trim()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

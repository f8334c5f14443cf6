use axum::Json;
use axum::extract::{Extension, State};
use intraextra_application::AccessPolicy;
use intraextra_core::UserIdentity;
use intraextra_domain::Section;
use tracing::debug;

use crate::dto::{
    AccessDecisionResponse, AccessProfileResponse, EvaluateAccessRequest, FilterSectionsRequest,
    MaskValueRequest, MaskValueResponse,
};
use crate::state::AppState;


pub async fn access_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<AccessProfileResponse> {
    let policy = &state.access_policy;
    let role = AccessPolicy::role_of(&user);

    Json(AccessProfileResponse::new(
        &user,
        policy.describe_role(role),
        policy.can_view_financials(role),
        policy.can_edit_financials(role),
        policy.can_edit_layouts(role),
    ))
}

pub async fn evaluate_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<EvaluateAccessRequest>,
) -> Json<AccessDecisionResponse> {
    let role = AccessPolicy::role_of(&user);
    let decision = state.access_policy.evaluate(
        role,
        payload.module.as_str(),
        payload.section.as_str(),
        payload.action.as_str(),
    );

    debug!(
        subject = %user.subject(),
        module = %payload.module,
        section = %payload.section,
        action = %payload.action,
        allowed = decision.allowed,
        "access evaluated"
    );
    Json(AccessDecisionResponse::from(decision))
}

pub async fn filter_sections_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<FilterSectionsRequest>,
) -> Json<Vec<Section>> {
    let role = AccessPolicy::role_of(&user);

    Json(
        state
            .access_policy
            .filter_sections_by_permission(&payload.sections, role),
    )
}

pub async fn mask_value_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<MaskValueRequest>,
) -> Json<MaskValueResponse> {
    let role = AccessPolicy::role_of(&user);

    Json(MaskValueResponse {
        value: state.access_policy.mask_sensitive_data(
            payload.value.as_str(),
            payload.sensitivity,
            role,
        ),
    })
}

use intraextra_application::{AccessDecision, RoleProfile};
use intraextra_core::UserIdentity;
use intraextra_domain::{DataSensitivity, Section};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role summary for the calling session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-profile-response.ts"
)]
pub struct AccessProfileResponse {
    pub subject: String,
    pub display_name: String,
    /// `null` when the session's role claim is not a known role.
    pub role: Option<String>,
    pub description: String,
    pub features: Vec<String>,
    pub capabilities: Vec<String>,
    pub default_page: String,
    pub can_view_financials: bool,
    pub can_edit_financials: bool,
    pub can_edit_layouts: bool,
}

impl AccessProfileResponse {
    pub fn new(
        identity: &UserIdentity,
        profile: RoleProfile,
        can_view_financials: bool,
        can_edit_financials: bool,
        can_edit_layouts: bool,
    ) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            role: profile.role.map(|role| role.as_str().to_owned()),
            description: profile.description.to_owned(),
            features: profile
                .features
                .iter()
                .map(|feature| (*feature).to_owned())
                .collect(),
            capabilities: profile
                .capabilities
                .iter()
                .map(|capability| capability.as_str().to_owned())
                .collect(),
            default_page: profile.default_page.to_owned(),
            can_view_financials,
            can_edit_financials,
            can_edit_layouts,
        }
    }
}

/// Incoming payload for an access check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/evaluate-access-request.ts"
)]
pub struct EvaluateAccessRequest {
    pub module: String,
    pub section: String,
    pub action: String,
}

/// Outcome of an access check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-decision-response.ts"
)]
pub struct AccessDecisionResponse {
    pub allowed: bool,
    pub reason: String,
}

impl From<AccessDecision> for AccessDecisionResponse {
    fn from(value: AccessDecision) -> Self {
        Self {
            allowed: value.allowed,
            reason: value.reason,
        }
    }
}

/// Cards to be filtered for the calling role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/filter-sections-request.ts"
)]
pub struct FilterSectionsRequest {
    #[ts(type = "Array<Record<string, unknown>>")]
    pub sections: Vec<Section>,
}

/// Value to be masked for display.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/mask-value-request.ts"
)]
pub struct MaskValueRequest {
    pub value: String,
    #[ts(type = "\"financial\" | \"general\"")]
    pub sensitivity: DataSensitivity,
}

/// Display form of a masked value.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/mask-value-response.ts"
)]
pub struct MaskValueResponse {
    pub value: String,
}

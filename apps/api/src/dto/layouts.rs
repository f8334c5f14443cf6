use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string accepted by the layout persistence endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutQuery {
    pub user_id: Option<String>,
}

impl LayoutQuery {
    /// Returns the user id, treating a blank value as absent.
    pub fn user_subject(&self) -> Option<String> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    }
}

/// Confirmation returned after a stored layout is removed.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/layout-deleted-response.ts"
)]
pub struct LayoutDeletedResponse {
    pub page_id: String,
    pub user_id: Option<String>,
}

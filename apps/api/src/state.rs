use intraextra_application::{AccessPolicy, LayoutService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub layout_service: LayoutService,
    pub access_policy: AccessPolicy,
    pub frontend_url: String,
}

use std::sync::Arc;

use async_trait::async_trait;
use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
use intraextra_core::AppResult;
use tracing::warn;

/// Remote layout store backed by a local store.
///
/// Scopes without a user never reach the remote store. Saves fall back to the
/// local store when the remote save fails; loads fall back when the remote
/// load fails or finds nothing.
pub struct FallbackLayoutRepository {
    remote: Arc<dyn LayoutRepository>,
    local: Arc<dyn LayoutRepository>,
}

impl FallbackLayoutRepository {
    /// Creates a composite over a remote and a local store.
    #[must_use]
    pub fn new(remote: Arc<dyn LayoutRepository>, local: Arc<dyn LayoutRepository>) -> Self {
        Self { remote, local }
    }
}

#[async_trait]
impl LayoutRepository for FallbackLayoutRepository {
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        if scope.user_subject.is_some() {
            match self.remote.save_layout(scope, document.clone()).await {
                Ok(()) => return Ok(()),
                Err(error) => {
                    warn!(
                        page_id = %scope.page_id,
                        %error,
                        "remote layout save failed, falling back to local storage"
                    );
                }
            }
        }

        self.local.save_layout(scope, document).await
    }

    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        if scope.user_subject.is_some() {
            match self.remote.find_layout(scope).await {
                Ok(Some(document)) => return Ok(Some(document)),
                Ok(None) => {
                    warn!(page_id = %scope.page_id, "no remote layout found, checking local storage");
                }
                Err(error) => {
                    warn!(
                        page_id = %scope.page_id,
                        %error,
                        "remote layout load failed, checking local storage"
                    );
                }
            }
        }

        self.local.find_layout(scope).await
    }

    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        if scope.user_subject.is_some() {
            self.remote.delete_layout(scope).await
        } else {
            self.local.delete_layout(scope).await
        }
    }
}

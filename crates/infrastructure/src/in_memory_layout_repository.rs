use std::collections::HashMap;

use async_trait::async_trait;
use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
use intraextra_core::AppResult;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local layout store keyed like browser local storage.
#[derive(Debug, Default)]
pub struct InMemoryLayoutRepository {
    documents: RwLock<HashMap<String, LayoutDocument>>,
}

impl InMemoryLayoutRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl LayoutRepository for InMemoryLayoutRepository {
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        self.documents
            .write()
            .await
            .insert(scope.local_key(), document);
        debug!(page_id = %scope.page_id, "layout saved in memory");
        Ok(())
    }

    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        Ok(self.documents.read().await.get(&scope.local_key()).cloned())
    }

    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        self.documents.write().await.remove(&scope.local_key());
        debug!(page_id = %scope.page_id, "layout cleared from memory");
        Ok(())
    }
}

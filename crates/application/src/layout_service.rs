use std::sync::Arc;

use intraextra_core::{AppError, AppResult, PageId};
use intraextra_domain::{GridOptions, Role, Section, default_sections};

use crate::{
    AccessPolicy, ContentMeasurer, LayoutController, LayoutDocument, LayoutRepository,
    LayoutScope, LayoutSnapshot,
};

#[cfg(test)]
mod tests;

/// Result of a lock-and-save request.
///
/// The switch to view mode happens before persistence and is not undone
/// when saving fails.
#[derive(Debug)]
pub enum LockOutcome {
    /// No lock confirmation was pending; nothing changed.
    NotPending,
    /// The layout was locked and persisted.
    Saved(LayoutDocument),
    /// The layout was locked but persisting it failed.
    SaveFailed {
        /// Layout that could not be stored.
        snapshot: LayoutSnapshot,
        /// Persistence error to surface to the user.
        error: AppError,
    },
}

impl LockOutcome {
    /// Returns whether the layout reached storage.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Application service for loading, locking and transferring page layouts.
#[derive(Clone)]
pub struct LayoutService {
    repository: Arc<dyn LayoutRepository>,
    policy: AccessPolicy,
    options: GridOptions,
}

impl LayoutService {
    /// Creates a new layout service.
    #[must_use]
    pub fn new(repository: Arc<dyn LayoutRepository>, options: GridOptions) -> Self {
        Self {
            repository,
            policy: AccessPolicy::default(),
            options,
        }
    }

    /// Returns the grid options controllers are created with.
    #[must_use]
    pub fn options(&self) -> GridOptions {
        self.options
    }

    /// Builds a controller from the stored layout, or from `defaults` when
    /// nothing is stored.
    pub async fn load_controller(
        &self,
        scope: &LayoutScope,
        defaults: Vec<Section>,
        measurer: Arc<dyn ContentMeasurer>,
    ) -> AppResult<LayoutController> {
        let controller = match self.repository.find_layout(scope).await? {
            Some(document) => {
                let (_, sections, dimensions) = document.into_parts();
                LayoutController::new(scope.page_id.clone(), sections, self.options, measurer)
                    .with_dimensions(dimensions)
            }
            None => LayoutController::new(scope.page_id.clone(), defaults, self.options, measurer),
        };

        Ok(controller)
    }

    /// Builds a controller for a catalog page, showing only the cards the
    /// role may see.
    pub async fn load_page(
        &self,
        scope: &LayoutScope,
        role: Option<Role>,
        measurer: Arc<dyn ContentMeasurer>,
    ) -> AppResult<LayoutController> {
        let defaults = default_sections(scope.page_id.as_str())?;
        let mut controller = self.load_controller(scope, defaults, measurer).await?;
        controller.retain_sections(|section| self.policy.section_visible(section, role));

        Ok(controller)
    }

    /// Confirms a pending lock and persists the resulting layout.
    pub async fn lock_and_save(
        &self,
        scope: &LayoutScope,
        controller: &mut LayoutController,
    ) -> LockOutcome {
        let Some(snapshot) = controller.confirm_lock() else {
            return LockOutcome::NotPending;
        };

        let document =
            LayoutDocument::from(snapshot.clone()).with_user(scope.user_subject.clone());
        match self.repository.save_layout(scope, document.clone()).await {
            Ok(()) => LockOutcome::Saved(document),
            Err(error) => LockOutcome::SaveFailed { snapshot, error },
        }
    }

    /// Deletes the stored layout and returns the page's default cards.
    pub async fn reset_to_default(&self, scope: &LayoutScope) -> AppResult<Vec<Section>> {
        self.repository.delete_layout(scope).await?;
        default_sections(scope.page_id.as_str())
    }

    /// Stores a layout document for the scope.
    pub async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        if document.page_id() != &scope.page_id {
            return Err(AppError::Validation(format!(
                "layout for page '{}' cannot be stored under page '{}'",
                document.page_id(),
                scope.page_id
            )));
        }

        self.repository
            .save_layout(scope, document.with_user(scope.user_subject.clone()))
            .await
    }

    /// Returns the stored layout document for the scope.
    pub async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        self.repository.find_layout(scope).await
    }

    /// Removes the stored layout for the scope.
    pub async fn clear_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        self.repository.delete_layout(scope).await
    }

    /// Returns the stored layout stamped for download.
    pub async fn export_layout(&self, scope: &LayoutScope) -> AppResult<LayoutDocument> {
        self.repository
            .find_layout(scope)
            .await?
            .map(LayoutDocument::into_export)
            .ok_or_else(|| {
                AppError::NotFound(format!("no saved layout for page '{}'", scope.page_id))
            })
    }

    /// Captures a controller's current layout as an export document.
    #[must_use]
    pub fn export_controller(&self, controller: &LayoutController) -> LayoutDocument {
        let snapshot = controller.snapshot();
        LayoutDocument::export(snapshot.page_id, snapshot.sections, snapshot.dimensions)
    }

    /// Validates an uploaded layout file and stores it for the user under
    /// the page id it names.
    pub async fn import_layout(
        &self,
        user_subject: Option<String>,
        text: &str,
    ) -> AppResult<LayoutDocument> {
        let imported = LayoutDocument::import_json(text)?;
        let page_id: PageId = imported.page_id().clone();
        let scope = LayoutScope::new(page_id, user_subject);
        let document = imported
            .with_user(scope.user_subject.clone())
            .into_saved();

        self.repository.save_layout(&scope, document.clone()).await?;
        Ok(document)
    }
}

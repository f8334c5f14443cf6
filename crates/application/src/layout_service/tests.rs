use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use intraextra_core::{AppError, AppResult, PageId};
use intraextra_domain::{
    FieldList, GridCell, GridDimensions, GridOptions, GridSpan, PointerPosition, Role, Section,
    SectionAccess,
};

use crate::{EditorMode, LayoutDocument, LayoutRepository, LayoutScope, UnmeasuredContent};

use super::{LayoutService, LockOutcome};

#[derive(Default)]
struct FakeLayoutRepository {
    documents: Mutex<HashMap<LayoutScope, LayoutDocument>>,
    deletes: Mutex<Vec<LayoutScope>>,
}

#[async_trait]
impl LayoutRepository for FakeLayoutRepository {
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        self.documents.lock().await.insert(scope.clone(), document);
        Ok(())
    }

    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        Ok(self.documents.lock().await.get(scope).cloned())
    }

    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        self.documents.lock().await.remove(scope);
        self.deletes.lock().await.push(scope.clone());
        Ok(())
    }
}

struct UnavailableLayoutRepository;

#[async_trait]
impl LayoutRepository for UnavailableLayoutRepository {
    async fn save_layout(&self, _scope: &LayoutScope, _document: LayoutDocument) -> AppResult<()> {
        Err(AppError::Internal("layout store unavailable".to_owned()))
    }

    async fn find_layout(&self, _scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        Ok(None)
    }

    async fn delete_layout(&self, _scope: &LayoutScope) -> AppResult<()> {
        Ok(())
    }
}

fn scope(page_id: &str) -> LayoutScope {
    LayoutScope::new(
        PageId::new(page_id).unwrap_or_else(|_| unreachable!()),
        Some("user-7".to_owned()),
    )
}

fn card(id: &str) -> Section {
    Section::new(
        id,
        id,
        id,
        GridCell::new(2, 2),
        GridSpan::new(3, 3),
        SectionAccess::Open,
        FieldList::default(),
    )
    .unwrap_or_else(|_| unreachable!())
}

fn service(repository: Arc<dyn LayoutRepository>) -> LayoutService {
    LayoutService::new(repository, GridOptions::default())
}

#[tokio::test]
async fn load_uses_defaults_when_nothing_is_stored() {
    let service = service(Arc::new(FakeLayoutRepository::default()));
    let controller = service
        .load_controller(&scope("logistics"), vec![card("a")], Arc::new(UnmeasuredContent))
        .await;

    assert!(controller.is_ok());
    let controller = controller.unwrap_or_else(|_| unreachable!());
    assert_eq!(controller.sections().len(), 1);
    assert_eq!(controller.dimensions(), GridDimensions::default());
    assert_eq!(controller.mode(), EditorMode::View);
}

#[tokio::test]
async fn lock_and_save_round_trips_through_the_repository() {
    let repository = Arc::new(FakeLayoutRepository::default());
    let service = service(repository.clone());
    let scope = scope("logistics");

    let mut controller = service
        .load_controller(&scope, vec![card("a")], Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(
        service.lock_and_save(&scope, &mut controller).await,
        LockOutcome::NotPending
    ));

    controller.enter_edit_mode();
    controller.set_grid_columns(42);
    controller.begin_drag("a");
    controller.drag_over(PointerPosition::new(190.0, 0.0));
    controller.drop();
    controller.request_lock();

    let outcome = service.lock_and_save(&scope, &mut controller).await;
    assert!(outcome.is_saved());
    assert_eq!(controller.mode(), EditorMode::View);

    let stored = repository.documents.lock().await.get(&scope).cloned();
    assert!(stored.is_some());
    let stored = stored.unwrap_or_else(|| unreachable!());
    assert_eq!(stored.user_id(), Some("user-7"));
    assert!(stored.saved_at().is_some());

    let reloaded = service
        .load_controller(&scope, Vec::new(), Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(reloaded.dimensions(), GridDimensions::new(42, 25));
    assert_eq!(
        reloaded.section("a").map(Section::position),
        Some(GridCell::new(6, 1))
    );
}

#[tokio::test]
async fn failed_save_keeps_view_mode_and_reports_error() {
    let service = service(Arc::new(UnavailableLayoutRepository));
    let scope = scope("logistics");
    let mut controller = service
        .load_controller(&scope, vec![card("a")], Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());

    controller.enter_edit_mode();
    controller.request_lock();
    let outcome = service.lock_and_save(&scope, &mut controller).await;

    match outcome {
        LockOutcome::SaveFailed { snapshot, error } => {
            assert_eq!(snapshot.sections.len(), 1);
            assert!(matches!(error, AppError::Internal(_)));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(controller.mode(), EditorMode::View);
}

#[tokio::test]
async fn load_page_hides_cards_the_role_cannot_see() {
    let service = service(Arc::new(FakeLayoutRepository::default()));
    let scope = scope("project-core-info");

    let senior = service
        .load_page(&scope, Some(Role::Senior), Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());
    let external = service
        .load_page(&scope, Some(Role::External), Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(senior.section("fees-overview").is_some());
    assert!(external.section("fees-overview").is_none());
    assert_eq!(external.sections().len() + 1, senior.sections().len());
}

#[tokio::test]
async fn reset_deletes_and_returns_catalog_defaults() {
    let repository = Arc::new(FakeLayoutRepository::default());
    let service = service(repository.clone());
    let scope = scope("crew-management");

    let document = LayoutDocument::saved(
        scope.page_id.clone(),
        vec![card("only")],
        GridDimensions::default(),
    );
    assert!(service.save_layout(&scope, document).await.is_ok());

    let defaults = service.reset_to_default(&scope).await.unwrap_or_default();
    assert_eq!(defaults.len(), 3);
    assert!(repository.documents.lock().await.is_empty());
    assert_eq!(repository.deletes.lock().await.len(), 1);
}

#[tokio::test]
async fn save_rejects_documents_for_another_page() {
    let service = service(Arc::new(FakeLayoutRepository::default()));
    let document = LayoutDocument::saved(
        PageId::new("logistics").unwrap_or_else(|_| unreachable!()),
        Vec::new(),
        GridDimensions::default(),
    );

    let result = service.save_layout(&scope("crew-management"), document).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn export_requires_a_stored_layout() {
    let service = service(Arc::new(FakeLayoutRepository::default()));
    let scope = scope("logistics");

    assert!(matches!(
        service.export_layout(&scope).await,
        Err(AppError::NotFound(_))
    ));

    let document = LayoutDocument::saved(
        scope.page_id.clone(),
        vec![card("a")],
        GridDimensions::default(),
    );
    assert!(service.save_layout(&scope, document).await.is_ok());

    let exported = service
        .export_layout(&scope)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(exported.version(), Some("1.0"));
    assert!(exported.exported_at().is_some());
}

#[tokio::test]
async fn import_stores_under_the_named_page() {
    let repository = Arc::new(FakeLayoutRepository::default());
    let service = service(repository.clone());

    let controller = service
        .load_controller(&scope("logistics"), vec![card("a")], Arc::new(UnmeasuredContent))
        .await
        .unwrap_or_else(|_| unreachable!());
    let text = service
        .export_controller(&controller)
        .to_pretty_json()
        .unwrap_or_default();

    let imported = service.import_layout(Some("user-7".to_owned()), &text).await;
    assert!(imported.is_ok());

    let stored = repository
        .documents
        .lock()
        .await
        .get(&scope("logistics"))
        .cloned();
    assert!(stored.is_some_and(|document| document.sections().len() == 1));

    let rejected = service.import_layout(None, r#"{"pageId": "logistics"}"#).await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
use intraextra_core::{AppError, AppResult};
use tracing::{info, warn};

/// Local layout store writing one JSON file per storage key.
///
/// A device-local store keys files by page only. A per-user store, as used
/// by the layouts API, appends the encoded user subject when the scope has one.
#[derive(Debug, Clone)]
pub struct FileLayoutRepository {
    directory: PathBuf,
    per_user: bool,
}

impl FileLayoutRepository {
    /// Creates a repository rooted at `directory`. The directory is created
    /// on first save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            per_user: false,
        }
    }

    /// Creates a repository that keeps a separate file per user.
    #[must_use]
    pub fn per_user(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            per_user: true,
        }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, scope: &LayoutScope) -> PathBuf {
        let file_name = match &scope.user_subject {
            Some(user_subject) if self.per_user => {
                format!("{}.{}.json", scope.local_key(), encode_subject(user_subject))
            }
            _ => format!("{}.json", scope.local_key()),
        };

        self.directory.join(file_name)
    }
}

/// Encodes a user subject into characters safe for a file name.
fn encode_subject(user_subject: &str) -> String {
    user_subject
        .bytes()
        .map(|byte| {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                char::from(byte).to_string()
            } else {
                format!("~{byte:02x}")
            }
        })
        .collect()
}

#[async_trait]
impl LayoutRepository for FileLayoutRepository {
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()> {
        let payload = serde_json::to_vec(&document).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize layout for page '{}': {error}",
                scope.page_id
            ))
        })?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create layout directory '{}': {error}",
                    self.directory.display()
                ))
            })?;

        let path = self.path_for(scope);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, payload).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write layout file '{}': {error}",
                staging.display()
            ))
        })?;
        tokio::fs::rename(&staging, &path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to replace layout file '{}': {error}",
                path.display()
            ))
        })?;

        info!(page_id = %scope.page_id, "layout saved locally");
        Ok(())
    }

    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>> {
        let path = self.path_for(scope);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read layout file '{}': {error}",
                    path.display()
                )));
            }
        };

        // An unreadable file behaves like no saved layout so the page falls
        // back to its defaults.
        match serde_json::from_str::<LayoutDocument>(&contents) {
            Ok(document) => {
                info!(page_id = %scope.page_id, "layout loaded locally");
                Ok(Some(document))
            }
            Err(error) => {
                warn!(page_id = %scope.page_id, %error, "ignoring corrupt layout file");
                Ok(None)
            }
        }
    }

    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()> {
        let path = self.path_for(scope);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to remove layout file '{}': {error}",
                    path.display()
                )));
            }
        }

        info!(page_id = %scope.page_id, "layout cleared locally");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use intraextra_application::{LayoutDocument, LayoutRepository, LayoutScope};
    use intraextra_core::PageId;
    use intraextra_domain::{GridDimensions, default_sections};

    use super::{FileLayoutRepository, encode_subject};

    fn scope() -> LayoutScope {
        user_scope(None)
    }

    fn user_scope(user: Option<&str>) -> LayoutScope {
        LayoutScope::new(
            PageId::new("project-core-info").unwrap_or_else(|_| unreachable!()),
            user.map(str::to_owned),
        )
    }

    #[tokio::test]
    async fn round_trips_documents_on_disk() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let repository = FileLayoutRepository::new(directory.path().join("layouts"));
        let document = LayoutDocument::saved(
            scope().page_id,
            default_sections("project-core-info").unwrap_or_default(),
            GridDimensions::new(36, 28),
        );

        assert!(repository.find_layout(&scope()).await.unwrap_or_default().is_none());
        assert!(repository.save_layout(&scope(), document.clone()).await.is_ok());
        assert!(
            directory
                .path()
                .join("layouts/intraextra_layout_project-core-info.json")
                .exists()
        );

        let found = repository.find_layout(&scope()).await.unwrap_or_default();
        assert!(found.is_some_and(|stored| stored.same_layout(&document)));

        assert!(repository.delete_layout(&scope()).await.is_ok());
        assert!(repository.find_layout(&scope()).await.unwrap_or_default().is_none());
        assert!(repository.delete_layout(&scope()).await.is_ok());
    }

    #[tokio::test]
    async fn corrupt_files_read_as_absent() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let repository = FileLayoutRepository::new(directory.path());
        let written = std::fs::write(
            directory
                .path()
                .join("intraextra_layout_project-core-info.json"),
            "{ not json",
        );
        assert!(written.is_ok());

        let found = repository.find_layout(&scope()).await;
        assert!(matches!(found, Ok(None)));
    }

    #[tokio::test]
    async fn per_user_store_separates_subjects() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let repository = FileLayoutRepository::per_user(directory.path());
        let document = LayoutDocument::saved(
            scope().page_id,
            Vec::new(),
            GridDimensions::new(36, 28),
        );

        assert!(
            repository
                .save_layout(&user_scope(Some("ops/lead")), document)
                .await
                .is_ok()
        );
        assert!(
            directory
                .path()
                .join("intraextra_layout_project-core-info.ops~2flead.json")
                .exists()
        );
        assert!(matches!(
            repository.find_layout(&user_scope(Some("ops/lead"))).await,
            Ok(Some(_))
        ));
        assert!(matches!(
            repository.find_layout(&user_scope(Some("other"))).await,
            Ok(None)
        ));
        assert!(matches!(repository.find_layout(&scope()).await, Ok(None)));
    }

    #[test]
    fn subjects_encode_to_safe_file_names() {
        assert_eq!(encode_subject("user-7_a"), "user-7_a");
        assert_eq!(encode_subject("../x y"), "~2e~2e~2fx~20y");
    }
}

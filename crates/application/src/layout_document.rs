use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use intraextra_core::{AppError, AppResult, PageId};
use intraextra_domain::{DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, GridDimensions, Section};

use crate::LayoutSnapshot;

/// Format version stamped on exported layout files.
pub const LAYOUT_EXPORT_VERSION: &str = "1.0";

/// Persisted or exported layout of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    page_id: PageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    sections: Vec<Section>,
    #[serde(default = "default_grid_columns")]
    grid_columns: u32,
    #[serde(default = "default_grid_rows")]
    grid_rows: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

fn default_grid_columns() -> u32 {
    DEFAULT_GRID_COLUMNS
}

fn default_grid_rows() -> u32 {
    DEFAULT_GRID_ROWS
}

impl LayoutDocument {
    /// Builds a document for persistence, stamped with `savedAt`.
    #[must_use]
    pub fn saved(page_id: PageId, sections: Vec<Section>, dimensions: GridDimensions) -> Self {
        Self {
            page_id,
            user_id: None,
            sections,
            grid_columns: dimensions.columns(),
            grid_rows: dimensions.rows(),
            saved_at: Some(Utc::now()),
            exported_at: None,
            version: None,
        }
    }

    /// Builds a document for file export, stamped with `exportedAt` and the
    /// export format version.
    #[must_use]
    pub fn export(page_id: PageId, sections: Vec<Section>, dimensions: GridDimensions) -> Self {
        Self {
            page_id,
            user_id: None,
            sections,
            grid_columns: dimensions.columns(),
            grid_rows: dimensions.rows(),
            saved_at: None,
            exported_at: Some(Utc::now()),
            version: Some(LAYOUT_EXPORT_VERSION.to_owned()),
        }
    }

    /// Parses an uploaded layout file.
    ///
    /// Only `pageId` and `sections` are required; no version migration is
    /// attempted.
    pub fn import_json(text: &str) -> AppResult<Self> {
        let value = serde_json::from_str::<Value>(text)
            .map_err(|error| AppError::Validation(format!("invalid layout file: {error}")))?;

        let Some(object) = value.as_object() else {
            return Err(AppError::Validation(
                "invalid layout file structure: expected a JSON object".to_owned(),
            ));
        };

        for required in ["pageId", "sections"] {
            if object.get(required).is_none_or(Value::is_null) {
                return Err(AppError::Validation(format!(
                    "invalid layout file structure: missing '{required}'"
                )));
            }
        }

        serde_json::from_value(value)
            .map_err(|error| AppError::Validation(format!("invalid layout file: {error}")))
    }

    /// Returns the page id.
    #[must_use]
    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    /// Returns the owning user when stored per user.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the stored sections.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the stored grid size.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.grid_columns, self.grid_rows)
    }

    /// Returns the save timestamp.
    #[must_use]
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Returns the export timestamp.
    #[must_use]
    pub fn exported_at(&self) -> Option<DateTime<Utc>> {
        self.exported_at
    }

    /// Returns the export format version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Tags the document with its owning user.
    #[must_use]
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Re-stamps the document for download.
    #[must_use]
    pub fn into_export(mut self) -> Self {
        self.exported_at = Some(Utc::now());
        self.version = Some(LAYOUT_EXPORT_VERSION.to_owned());
        self
    }

    /// Re-stamps the document as saved now.
    #[must_use]
    pub fn into_saved(mut self) -> Self {
        self.saved_at = Some(Utc::now());
        self
    }

    /// Suggested download file name: `<pageId>-layout-<epoch millis>.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let stamp = self
            .exported_at
            .or(self.saved_at)
            .unwrap_or_else(Utc::now)
            .timestamp_millis();

        format!("{}-layout-{stamp}.json", self.page_id)
    }

    /// Serializes with two-space indentation for download.
    pub fn to_pretty_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize layout for page '{}': {error}",
                self.page_id
            ))
        })
    }

    /// Returns whether two documents describe the same layout, ignoring
    /// timestamps and ownership.
    #[must_use]
    pub fn same_layout(&self, other: &Self) -> bool {
        self.page_id == other.page_id
            && self.sections == other.sections
            && self.dimensions() == other.dimensions()
    }

    /// Splits the document into its page, sections and grid size.
    #[must_use]
    pub fn into_parts(self) -> (PageId, Vec<Section>, GridDimensions) {
        let dimensions = self.dimensions();
        (self.page_id, self.sections, dimensions)
    }
}

impl From<LayoutSnapshot> for LayoutDocument {
    fn from(snapshot: LayoutSnapshot) -> Self {
        Self::saved(snapshot.page_id, snapshot.sections, snapshot.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use intraextra_core::{AppError, PageId};
    use intraextra_domain::{GridDimensions, default_sections};

    use super::{LAYOUT_EXPORT_VERSION, LayoutDocument};

    fn page() -> PageId {
        PageId::new("project-core-info").unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn export_then_import_reconstructs_layout() {
        let sections = default_sections("project-core-info").unwrap_or_default();
        let exported = LayoutDocument::export(page(), sections, GridDimensions::new(40, 30));
        assert_eq!(exported.version(), Some(LAYOUT_EXPORT_VERSION));

        let text = exported.to_pretty_json().unwrap_or_default();
        assert!(text.contains("\"exportedAt\""));
        assert!(text.contains("\"gridColumns\": 40"));

        let imported = LayoutDocument::import_json(&text);
        assert!(imported.is_ok());
        let imported = imported.unwrap_or_else(|_| unreachable!());
        assert!(imported.same_layout(&exported));
    }

    #[test]
    fn import_names_the_missing_field() {
        let missing_page = LayoutDocument::import_json(r#"{"sections": []}"#);
        assert!(
            matches!(missing_page, Err(AppError::Validation(message)) if message.contains("pageId"))
        );

        let missing_sections = LayoutDocument::import_json(r#"{"pageId": "logistics"}"#);
        assert!(
            matches!(missing_sections, Err(AppError::Validation(message)) if message.contains("sections"))
        );

        let not_json = LayoutDocument::import_json("layout");
        assert!(matches!(not_json, Err(AppError::Validation(_))));
    }

    #[test]
    fn import_defaults_missing_grid_size() {
        let imported = LayoutDocument::import_json(r#"{"pageId": "logistics", "sections": []}"#)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(imported.dimensions(), GridDimensions::default());
        assert!(imported.version().is_none());
    }

    #[test]
    fn file_name_uses_export_timestamp() {
        let exported = LayoutDocument::export(page(), Vec::new(), GridDimensions::default());
        let millis = exported
            .exported_at()
            .map(|stamp| stamp.timestamp_millis())
            .unwrap_or_default();
        assert_eq!(
            exported.file_name(),
            format!("project-core-info-layout-{millis}.json")
        );
    }

    #[test]
    fn saved_document_reads_legacy_storage_shape() {
        let stored = r#"{
            "pageId": "crew-management",
            "sections": [{
                "id": "crew-roster", "title": "Crew Roster", "type": "crew-roster",
                "gridColumn": 1, "gridRow": 1, "gridColumnSpan": 15, "gridRowSpan": 8
            }],
            "gridColumns": 35,
            "gridRows": 25,
            "savedAt": "2025-01-10T12:00:00.000Z"
        }"#;

        let document = serde_json::from_str::<LayoutDocument>(stored);
        assert!(document.is_ok());
        let document = document.unwrap_or_else(|_| unreachable!());
        assert!(document.saved_at().is_some());
        assert_eq!(document.sections().len(), 1);
    }
}

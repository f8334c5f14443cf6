use async_trait::async_trait;

use intraextra_core::{AppResult, PageId};

use crate::LayoutDocument;

/// Key prefix used by local layout stores.
pub const LOCAL_LAYOUT_KEY_PREFIX: &str = "intraextra_layout_";

/// Identifies one persisted layout: a page, optionally narrowed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutScope {
    /// Page the layout belongs to.
    pub page_id: PageId,
    /// Session subject when the layout is stored per user.
    pub user_subject: Option<String>,
}

impl LayoutScope {
    /// Creates a scope for a page.
    #[must_use]
    pub fn new(page_id: PageId, user_subject: Option<String>) -> Self {
        Self {
            page_id,
            user_subject,
        }
    }

    /// Key used by local stores. Local stores are per browser profile, so the
    /// user is not part of the key.
    #[must_use]
    pub fn local_key(&self) -> String {
        format!("{LOCAL_LAYOUT_KEY_PREFIX}{}", self.page_id)
    }
}

/// Repository port for persisted page layouts.
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// Stores a layout document, replacing any previous one.
    async fn save_layout(&self, scope: &LayoutScope, document: LayoutDocument) -> AppResult<()>;

    /// Loads a layout document if one was stored.
    async fn find_layout(&self, scope: &LayoutScope) -> AppResult<Option<LayoutDocument>>;

    /// Removes a stored layout. Missing layouts are not an error.
    async fn delete_layout(&self, scope: &LayoutScope) -> AppResult<()>;
}

/// Measured box of a rendered card's content area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBox {
    /// Full content width.
    pub scroll_width: f64,
    /// Full content height.
    pub scroll_height: f64,
    /// Visible width.
    pub client_width: f64,
    /// Visible height.
    pub client_height: f64,
}

impl ContentBox {
    /// Returns whether content is clipped on either axis.
    #[must_use]
    pub fn is_clipped(&self) -> bool {
        self.scroll_height > self.client_height || self.scroll_width > self.client_width
    }
}

/// Port that measures rendered card content.
pub trait ContentMeasurer: Send + Sync {
    /// Returns the content box of a card, or `None` when it is not rendered.
    fn measure(&self, section_id: &str) -> Option<ContentBox>;
}

/// Measurer for contexts without a renderer; nothing is ever clipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmeasuredContent;

impl ContentMeasurer for UnmeasuredContent {
    fn measure(&self, _section_id: &str) -> Option<ContentBox> {
        None
    }
}

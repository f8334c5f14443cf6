//! Per-page layout editor state machine.
//!
//! A [`LayoutController`] owns the card list and grid size of one mounted
//! page. Gestures are synchronous `&mut self` calls; calls made outside the
//! mode they need are ignored and report `false`/`None` rather than failing.

use std::collections::BTreeSet;
use std::sync::Arc;

use intraextra_core::PageId;
use intraextra_domain::{GridCell, GridDimensions, GridOptions, PointerPosition, Section};

use crate::ContentMeasurer;

mod cards;
mod drag;
mod grid;
mod resize;
mod settle;


/// Top-level editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorMode {
    /// Read-only presentation. Initial mode.
    View,
    /// Gestures and configuration changes are enabled.
    Edit,
}

impl EditorMode {
    /// Returns a stable lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

/// Layout state handed to persistence when a lock is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSnapshot {
    /// Page the layout belongs to.
    pub page_id: PageId,
    /// Cards in display order.
    pub sections: Vec<Section>,
    /// Grid size at lock time.
    pub dimensions: GridDimensions,
}

/// Emitted once per batch of layout mutations when the layout settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSettled {
    /// Page the event belongs to.
    pub page_id: PageId,
    /// Mutation counter at settle time.
    pub revision: u64,
    /// Grid size at settle time.
    pub dimensions: GridDimensions,
    /// Cards whose content was clipped when measured.
    pub overflowing: BTreeSet<String>,
}

/// Subscriber notified after each settled batch.
pub trait LayoutObserver: Send + Sync {
    /// Receives a settled-layout event.
    fn layout_settled(&self, event: &LayoutSettled);
}

#[derive(Debug, Clone)]
struct DragState {
    section_id: String,
    target: Option<GridCell>,
}

#[derive(Debug, Clone)]
struct ResizeState {
    section_id: String,
    origin: PointerPosition,
}

/// Editor for one page's card layout.
pub struct LayoutController {
    page_id: PageId,
    sections: Vec<Section>,
    dimensions: GridDimensions,
    options: GridOptions,
    mode: EditorMode,
    lock_pending: bool,
    drag: Option<DragState>,
    resize: Option<ResizeState>,
    grid_guides: bool,
    overflowing: BTreeSet<String>,
    revision: u64,
    settled_revision: u64,
    measurer: Arc<dyn ContentMeasurer>,
    observers: Vec<Arc<dyn LayoutObserver>>,
}

impl LayoutController {
    /// Creates a controller in view mode with the default grid size.
    ///
    /// The initial state counts as unsettled so the first [`Self::settle`]
    /// measures overflow.
    #[must_use]
    pub fn new(
        page_id: PageId,
        sections: Vec<Section>,
        options: GridOptions,
        measurer: Arc<dyn ContentMeasurer>,
    ) -> Self {
        Self {
            page_id,
            sections,
            dimensions: options.defaults(),
            options,
            mode: EditorMode::View,
            lock_pending: false,
            drag: None,
            resize: None,
            grid_guides: true,
            overflowing: BTreeSet::new(),
            revision: 1,
            settled_revision: 0,
            measurer,
            observers: Vec::new(),
        }
    }

    /// Seeds a persisted grid size, clamped into the configured bounds.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: GridDimensions) -> Self {
        self.dimensions = self.options.clamp(dimensions);
        self
    }

    /// Returns the page id.
    #[must_use]
    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    /// Returns the cards in display order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Finds a card by id.
    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.id().as_str() == section_id)
    }

    /// Returns the current grid size.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Returns the grid options the page mounted with.
    #[must_use]
    pub fn options(&self) -> GridOptions {
        self.options
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Returns whether a lock confirmation is awaiting an answer.
    #[must_use]
    pub fn is_lock_pending(&self) -> bool {
        self.lock_pending
    }

    /// Returns whether a drag gesture is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Returns whether a resize gesture is active.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Returns the card being resized.
    #[must_use]
    pub fn resizing_section(&self) -> Option<&str> {
        self.resize.as_ref().map(|state| state.section_id.as_str())
    }

    /// Returns the card being dragged.
    #[must_use]
    pub fn dragged_section(&self) -> Option<&str> {
        self.drag.as_ref().map(|state| state.section_id.as_str())
    }

    /// Returns whether grid guide lines are drawn.
    #[must_use]
    pub fn grid_guides_visible(&self) -> bool {
        self.mode == EditorMode::Edit && self.grid_guides
    }

    /// Flips the guide overlay preference and returns the new value.
    pub fn toggle_grid_guides(&mut self) -> bool {
        self.grid_guides = !self.grid_guides;
        self.grid_guides
    }

    /// Enters edit mode. Returns `false` when already editing.
    pub fn enter_edit_mode(&mut self) -> bool {
        if self.mode == EditorMode::Edit {
            return false;
        }

        self.mode = EditorMode::Edit;
        true
    }

    /// Opens the lock confirmation step. Gestures in progress are abandoned
    /// so the layout being confirmed cannot change.
    pub fn request_lock(&mut self) -> bool {
        if self.mode != EditorMode::Edit || self.lock_pending {
            return false;
        }

        self.lock_pending = true;
        self.drag = None;
        self.resize = None;
        true
    }

    /// Dismisses the lock confirmation; edit mode and all edits remain.
    pub fn cancel_lock(&mut self) -> bool {
        std::mem::replace(&mut self.lock_pending, false)
    }

    /// Confirms the lock, returning to view mode.
    ///
    /// Returns the layout to persist, or `None` when no confirmation was
    /// pending.
    pub fn confirm_lock(&mut self) -> Option<LayoutSnapshot> {
        if !self.lock_pending {
            return None;
        }

        self.lock_pending = false;
        self.drag = None;
        self.resize = None;
        self.mode = EditorMode::View;

        Some(self.snapshot())
    }

    /// Captures the current layout.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            page_id: self.page_id.clone(),
            sections: self.sections.clone(),
            dimensions: self.dimensions,
        }
    }

    /// Drops cards that fail the predicate, in any mode. Used to apply
    /// visibility rules before a page is shown.
    pub fn retain_sections(&mut self, mut keep: impl FnMut(&Section) -> bool) {
        let before = self.sections.len();
        self.sections.retain(|section| keep(section));
        if self.sections.len() != before {
            self.touch();
        }
    }

    /// Lists cards that extend past the grid edge.
    #[must_use]
    pub fn boundary_violations(&self) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|section| section.overflows_grid(self.dimensions))
            .collect()
    }

    fn editing(&self) -> bool {
        self.mode == EditorMode::Edit && !self.lock_pending
    }

    fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.id().as_str() == section_id)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

use intraextra_domain::GridSpan;

use super::*;

impl LayoutController {
    /// Starts resizing a card from the given pointer position.
    pub fn begin_resize(&mut self, section_id: &str, pointer: PointerPosition) -> bool {
        if !self.editing() || self.section(section_id).is_none() {
            return false;
        }

        self.drag = None;
        self.resize = Some(ResizeState {
            section_id: section_id.to_owned(),
            origin: pointer,
        });
        true
    }

    /// Applies pointer movement to the card being resized.
    ///
    /// Whole-cell deltas are measured from the last committed pointer, so the
    /// origin moves each time the span changes. Returns the new span when it
    /// changed.
    pub fn resize_move(&mut self, pointer: PointerPosition) -> Option<GridSpan> {
        if !self.editing() {
            return None;
        }

        let state = self.resize.clone()?;
        let geometry = self.options.geometry();
        let column_delta = geometry.cells_for_delta(pointer.x - state.origin.x);
        let row_delta = geometry.cells_for_delta(pointer.y - state.origin.y);
        let dimensions = self.dimensions;

        let section = self.section_mut(&state.section_id)?;
        let current = section.span();
        let next = current.resized(
            column_delta,
            row_delta,
            section.position().column(),
            dimensions,
        );
        if next == current {
            return None;
        }

        section.resize_to(next);
        if let Some(resize) = self.resize.as_mut() {
            resize.origin = pointer;
        }
        self.touch();

        Some(next)
    }

    /// Ends the resize gesture.
    pub fn end_resize(&mut self) -> bool {
        self.resize.take().is_some()
    }
}

use super::*;

impl LayoutController {
    /// Starts dragging a card. Position is unchanged until [`Self::drop`].
    pub fn begin_drag(&mut self, section_id: &str) -> bool {
        if !self.editing() || self.section(section_id).is_none() {
            return false;
        }

        self.resize = None;
        self.drag = Some(DragState {
            section_id: section_id.to_owned(),
            target: None,
        });
        true
    }

    /// Records the cell under the pointer as the drop target.
    ///
    /// The pointer is relative to the grid container origin.
    pub fn drag_over(&mut self, pointer: PointerPosition) -> Option<GridCell> {
        if !self.editing() {
            return None;
        }

        let cell = self
            .options
            .geometry()
            .cell_at(pointer, self.dimensions);
        let drag = self.drag.as_mut()?;
        drag.target = Some(cell);

        Some(cell)
    }

    /// Returns the current drop target.
    #[must_use]
    pub fn drop_target(&self) -> Option<GridCell> {
        self.drag.as_ref().and_then(|drag| drag.target)
    }

    /// Moves the dragged card to the drop target. Drag state is cleared
    /// whether or not a move happened.
    pub fn drop(&mut self) -> bool {
        if !self.editing() {
            return false;
        }

        let Some(DragState {
            section_id,
            target: Some(target),
        }) = self.drag.take()
        else {
            return false;
        };

        let Some(section) = self.section_mut(&section_id) else {
            return false;
        };
        if section.position() == target {
            return false;
        }

        section.move_to(target);
        self.touch();
        true
    }

    /// Abandons the drag without moving anything.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }
}

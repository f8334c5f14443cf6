use super::*;

impl LayoutController {
    /// Sets the column count, clamped into bounds. Returns the applied value.
    pub fn set_grid_columns(&mut self, columns: u32) -> Option<u32> {
        if !self.editing() {
            return None;
        }

        let columns = self.options.bounds().clamp_columns(columns);
        self.resize_grid(GridDimensions::new(columns, self.dimensions.rows()));
        Some(columns)
    }

    /// Sets the row count, clamped into bounds. Returns the applied value.
    pub fn set_grid_rows(&mut self, rows: u32) -> Option<u32> {
        if !self.editing() {
            return None;
        }

        let rows = self.options.bounds().clamp_rows(rows);
        self.resize_grid(GridDimensions::new(self.dimensions.columns(), rows));
        Some(rows)
    }

    /// Restores the default grid size. Card positions are left alone.
    pub fn reset_grid(&mut self) -> bool {
        if !self.editing() {
            return false;
        }

        self.resize_grid(self.options.defaults());
        true
    }

    fn resize_grid(&mut self, dimensions: GridDimensions) {
        if self.dimensions != dimensions {
            self.dimensions = dimensions;
            self.touch();
        }
    }
}

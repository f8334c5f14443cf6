use serde::{Deserialize, Serialize};

/// Default column count for a freshly mounted page.
pub const DEFAULT_GRID_COLUMNS: u32 = 35;
/// Default row count for a freshly mounted page.
pub const DEFAULT_GRID_ROWS: u32 = 25;
/// Default square cell size in pixels.
pub const DEFAULT_CELL_SIZE_PX: u32 = 30;
/// Default gap between cells in pixels.
pub const DEFAULT_GAP_PX: u32 = 8;

/// One-based grid coordinate of a card's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    column: u32,
    row: u32,
}

impl GridCell {
    /// Creates a cell, lifting zero coordinates to one.
    #[must_use]
    pub fn new(column: u32, row: u32) -> Self {
        Self {
            column: column.max(1),
            row: row.max(1),
        }
    }

    /// Returns the one-based column.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the one-based row.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }
}

/// Card extent in cells. Both axes are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpan {
    columns: u32,
    rows: u32,
}

impl GridSpan {
    /// Creates a span, clamping collapsed extents to one cell.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Returns the column span.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Returns the row span.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Applies a cell delta to both axes.
    ///
    /// Column span is capped so the card ends at or before the last grid
    /// column when anchored at `column`. Row span is deliberately left
    /// uncapped against the grid height.
    #[must_use]
    pub fn resized(
        &self,
        column_delta: i64,
        row_delta: i64,
        column: u32,
        dimensions: GridDimensions,
    ) -> Self {
        let grown_columns = (i64::from(self.columns) + column_delta).max(1);
        let grown_rows = (i64::from(self.rows) + row_delta).max(1);

        let max_column_span = i64::from(dimensions.columns()) - i64::from(column) + 1;
        let capped_columns = grown_columns.min(max_column_span).max(1);

        Self::new(saturating_u32(capped_columns), saturating_u32(grown_rows))
    }
}

/// Grid size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates grid dimensions with at least one cell per axis.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Returns the column count.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Returns the row count.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS)
    }
}

/// Inclusive limits applied to grid dimension changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    min_columns: u32,
    max_columns: u32,
    min_rows: u32,
    max_rows: u32,
}

impl GridBounds {
    /// Creates bounds; inverted pairs are swapped.
    #[must_use]
    pub fn new(min_columns: u32, max_columns: u32, min_rows: u32, max_rows: u32) -> Self {
        Self {
            min_columns: min_columns.min(max_columns).max(1),
            max_columns: max_columns.max(min_columns).max(1),
            min_rows: min_rows.min(max_rows).max(1),
            max_rows: max_rows.max(min_rows).max(1),
        }
    }

    /// Clamps a requested column count.
    #[must_use]
    pub fn clamp_columns(&self, columns: u32) -> u32 {
        columns.clamp(self.min_columns, self.max_columns)
    }

    /// Clamps a requested row count.
    #[must_use]
    pub fn clamp_rows(&self, rows: u32) -> u32 {
        rows.clamp(self.min_rows, self.max_rows)
    }

    /// Returns the minimum column count.
    #[must_use]
    pub fn min_columns(&self) -> u32 {
        self.min_columns
    }

    /// Returns the maximum column count.
    #[must_use]
    pub fn max_columns(&self) -> u32 {
        self.max_columns
    }

    /// Returns the minimum row count.
    #[must_use]
    pub fn min_rows(&self) -> u32 {
        self.min_rows
    }

    /// Returns the maximum row count.
    #[must_use]
    pub fn max_rows(&self) -> u32 {
        self.max_rows
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(3, 100, 3, 100)
    }
}

/// Pointer position in pixels, relative to the grid container origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl PointerPosition {
    /// Creates a pointer position.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel geometry of the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    cell_size_px: u32,
    gap_px: u32,
}

impl GridGeometry {
    /// Creates a geometry; a zero cell size is lifted to one pixel.
    #[must_use]
    pub fn new(cell_size_px: u32, gap_px: u32) -> Self {
        Self {
            cell_size_px: cell_size_px.max(1),
            gap_px,
        }
    }

    /// Returns the cell size in pixels.
    #[must_use]
    pub fn cell_size_px(&self) -> u32 {
        self.cell_size_px
    }

    /// Returns the gap in pixels.
    #[must_use]
    pub fn gap_px(&self) -> u32 {
        self.gap_px
    }

    /// Distance in pixels from one cell origin to the next.
    #[must_use]
    pub fn pitch_px(&self) -> f64 {
        f64::from(self.cell_size_px) + f64::from(self.gap_px)
    }

    /// Maps a pointer position to the grid cell under it.
    ///
    /// `column = floor(x / pitch) + 1`, clamped to `[1, columns]`; rows
    /// likewise. Pure in its inputs.
    #[must_use]
    pub fn cell_at(&self, pointer: PointerPosition, dimensions: GridDimensions) -> GridCell {
        let pitch = self.pitch_px();
        let column = axis_index(pointer.x, pitch, dimensions.columns());
        let row = axis_index(pointer.y, pitch, dimensions.rows());

        GridCell::new(column, row)
    }

    /// Converts a pixel delta to whole cells.
    ///
    /// Halves round toward positive infinity, matching browser rounding.
    #[must_use]
    pub fn cells_for_delta(&self, delta_px: f64) -> i64 {
        if !delta_px.is_finite() {
            return 0;
        }

        let cells = (delta_px / self.pitch_px() + 0.5).floor();
        cells.clamp(i64::MIN as f64, i64::MAX as f64) as i64
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE_PX, DEFAULT_GAP_PX)
    }
}

/// Grid configuration a page mounts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridOptions {
    defaults: GridDimensions,
    bounds: GridBounds,
    geometry: GridGeometry,
}

impl GridOptions {
    /// Creates grid options; defaults are clamped into the bounds.
    #[must_use]
    pub fn new(defaults: GridDimensions, bounds: GridBounds, geometry: GridGeometry) -> Self {
        Self {
            defaults: GridDimensions::new(
                bounds.clamp_columns(defaults.columns()),
                bounds.clamp_rows(defaults.rows()),
            ),
            bounds,
            geometry,
        }
    }

    /// Returns the default dimensions used on mount and reset.
    #[must_use]
    pub fn defaults(&self) -> GridDimensions {
        self.defaults
    }

    /// Returns the dimension bounds.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Returns the pixel geometry.
    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Clamps arbitrary dimensions into the configured bounds.
    #[must_use]
    pub fn clamp(&self, dimensions: GridDimensions) -> GridDimensions {
        GridDimensions::new(
            self.bounds.clamp_columns(dimensions.columns()),
            self.bounds.clamp_rows(dimensions.rows()),
        )
    }
}

fn axis_index(offset_px: f64, pitch_px: f64, limit: u32) -> u32 {
    if !offset_px.is_finite() {
        return if offset_px > 0.0 { limit } else { 1 };
    }

    let index = (offset_px / pitch_px).floor() + 1.0;
    index.clamp(1.0, f64::from(limit)) as u32
}

fn saturating_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{GridBounds, GridDimensions, GridGeometry, GridSpan, PointerPosition};

    #[test]
    fn cell_at_uses_cell_pitch() {
        let geometry = GridGeometry::new(30, 8);
        let cell = geometry.cell_at(PointerPosition::new(76.0, 0.0), GridDimensions::new(35, 25));
        assert_eq!((cell.column(), cell.row()), (3, 1));
    }

    #[test]
    fn cell_at_clamps_at_both_edges() {
        let geometry = GridGeometry::default();
        let dimensions = GridDimensions::new(10, 4);

        let origin = geometry.cell_at(PointerPosition::new(0.0, 0.0), dimensions);
        assert_eq!((origin.column(), origin.row()), (1, 1));

        let width = 10.0 * geometry.pitch_px();
        let far = geometry.cell_at(PointerPosition::new(width, 4.0 * geometry.pitch_px()), dimensions);
        assert_eq!((far.column(), far.row()), (10, 4));

        let negative = geometry.cell_at(PointerPosition::new(-40.0, -1.0), dimensions);
        assert_eq!((negative.column(), negative.row()), (1, 1));
    }

    #[test]
    fn cells_for_delta_rounds_halves_up() {
        let geometry = GridGeometry::new(30, 8);
        assert_eq!(geometry.cells_for_delta(19.0), 1);
        assert_eq!(geometry.cells_for_delta(18.9), 0);
        assert_eq!(geometry.cells_for_delta(-19.0), 0);
        assert_eq!(geometry.cells_for_delta(-19.1), -1);
        assert_eq!(geometry.cells_for_delta(f64::NAN), 0);
    }

    #[test]
    fn resized_caps_columns_but_not_rows() {
        let span = GridSpan::new(4, 4).resized(10, 50, 30, GridDimensions::new(35, 25));
        assert_eq!(span.columns(), 6);
        assert_eq!(span.rows(), 54);
    }

    #[test]
    fn resized_never_collapses_when_card_sits_past_the_grid() {
        let span = GridSpan::new(4, 2).resized(0, 0, 40, GridDimensions::new(35, 25));
        assert_eq!(span.columns(), 1);
    }

    #[test]
    fn bounds_clamp_requested_dimensions() {
        let bounds = GridBounds::default();
        assert_eq!(bounds.clamp_columns(0), 3);
        assert_eq!(bounds.clamp_columns(500), 100);
        assert_eq!(bounds.clamp_rows(42), 42);
    }

    proptest! {
        #[test]
        fn cell_at_stays_inside_the_grid(
            x in -5_000.0f64..5_000.0,
            y in -5_000.0f64..5_000.0,
            columns in 1u32..120,
            rows in 1u32..120,
            cell in 1u32..80,
            gap in 0u32..20,
        ) {
            let dimensions = GridDimensions::new(columns, rows);
            let cell = GridGeometry::new(cell, gap).cell_at(PointerPosition::new(x, y), dimensions);
            prop_assert!(cell.column() >= 1 && cell.column() <= columns);
            prop_assert!(cell.row() >= 1 && cell.row() <= rows);
        }

        #[test]
        fn resized_span_is_positive_and_fits_columns(
            start_columns in 1u32..40,
            start_rows in 1u32..40,
            column_delta in -500i64..500,
            row_delta in -500i64..500,
            column in 1u32..35,
        ) {
            let dimensions = GridDimensions::new(35, 25);
            let span = GridSpan::new(start_columns, start_rows)
                .resized(column_delta, row_delta, column, dimensions);
            prop_assert!(span.columns() >= 1);
            prop_assert!(span.rows() >= 1);
            prop_assert!(column + span.columns() - 1 <= dimensions.columns());
        }
    }
}

//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod field;
mod grid;
mod section;
mod security;

pub use catalog::{CATALOG_PAGE_IDS, default_sections};
pub use field::{Field, FieldKind, FieldList, FieldUpdate};
pub use grid::{
    DEFAULT_CELL_SIZE_PX, DEFAULT_GAP_PX, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, GridBounds,
    GridCell, GridDimensions, GridGeometry, GridOptions, GridSpan, PointerPosition,
};
pub use section::{Section, SectionAccess};
pub use security::{
    Capability, DataSensitivity, EXPORT_ACCESS, MODULE_ACCESS, PermissionRecord, Role, RoleSet,
    SECTION_ACTION_RULES,
};

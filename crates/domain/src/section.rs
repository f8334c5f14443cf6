use intraextra_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{FieldList, GridCell, GridDimensions, GridSpan, Role, RoleSet};

const FINANCIAL_PERMISSION_TYPE: &str = "financial";

/// Visibility rule attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionAccess {
    /// Visible to every role.
    Open,
    /// Carries monetary figures; visible to financial readers and to any
    /// explicitly allowed role.
    Financial {
        /// Extra roles allowed regardless of financial capability.
        allowed_roles: Option<RoleSet>,
    },
    /// Visible only to the listed roles.
    Roles(RoleSet),
    /// Requires permission without naming a rule; the senior-or-higher
    /// default applies.
    Restricted,
}

impl SectionAccess {
    /// Returns whether any permission gate applies.
    #[must_use]
    pub fn requires_permission(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Returns whether the section is tagged as financial.
    #[must_use]
    pub fn is_financial(&self) -> bool {
        matches!(self, Self::Financial { .. })
    }
}

/// A positioned, resizable card on a page grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord", into = "SectionRecord")]
pub struct Section {
    id: NonEmptyString,
    title: NonEmptyString,
    kind: NonEmptyString,
    position: GridCell,
    span: GridSpan,
    access: SectionAccess,
    fields: FieldList,
}

impl Section {
    /// Creates a validated section.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: impl Into<String>,
        position: GridCell,
        span: GridSpan,
        access: SectionAccess,
        fields: FieldList,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            title: NonEmptyString::new(title)?,
            kind: NonEmptyString::new(kind)?,
            position,
            span,
            access,
            fields,
        })
    }

    /// Returns section id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns card title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the renderer tag.
    #[must_use]
    pub fn kind(&self) -> &NonEmptyString {
        &self.kind
    }

    /// Returns the top-left cell.
    #[must_use]
    pub fn position(&self) -> GridCell {
        self.position
    }

    /// Returns the extent in cells.
    #[must_use]
    pub fn span(&self) -> GridSpan {
        self.span
    }

    /// Returns the visibility rule.
    #[must_use]
    pub fn access(&self) -> &SectionAccess {
        &self.access
    }

    /// Returns the ordered fields.
    #[must_use]
    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// Returns the ordered fields for editing.
    pub fn fields_mut(&mut self) -> &mut FieldList {
        &mut self.fields
    }

    /// Moves the card's top-left corner.
    pub fn move_to(&mut self, position: GridCell) {
        self.position = position;
    }

    /// Replaces the card extent.
    pub fn resize_to(&mut self, span: GridSpan) {
        self.span = span;
    }

    /// Renames the card.
    pub fn rename(&mut self, title: impl Into<String>) -> AppResult<()> {
        self.title = NonEmptyString::new(title).map_err(|_| {
            AppError::Validation(format!("card '{}' title cannot be empty", self.id))
        })?;
        Ok(())
    }

    /// Returns whether the card extends past the grid on either axis.
    #[must_use]
    pub fn overflows_grid(&self, dimensions: GridDimensions) -> bool {
        let last_column =
            u64::from(self.position.column()) + u64::from(self.span.columns()) - 1;
        let last_row = u64::from(self.position.row()) + u64::from(self.span.rows()) - 1;

        last_column > u64::from(dimensions.columns()) || last_row > u64::from(dimensions.rows())
    }
}

/// Flat wire shape of a section as stored in layout documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionRecord {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    grid_column: u32,
    grid_row: u32,
    grid_column_span: u32,
    grid_row_span: u32,
    #[serde(default)]
    requires_permission: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    permission_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_roles: Option<Vec<String>>,
    #[serde(default)]
    fields: FieldList,
}

impl TryFrom<SectionRecord> for Section {
    type Error = AppError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        if record.grid_column == 0 || record.grid_row == 0 {
            return Err(AppError::Validation(format!(
                "section '{}' grid coordinates are one-based",
                record.id
            )));
        }

        // Unrecognised role names can never match a session, so they are dropped.
        let allowed_roles = record.allowed_roles.map(|roles| {
            roles
                .iter()
                .filter_map(|role| Role::from_claim(role))
                .collect::<RoleSet>()
        });

        let access = if !record.requires_permission {
            SectionAccess::Open
        } else if record.permission_type.as_deref() == Some(FINANCIAL_PERMISSION_TYPE) {
            SectionAccess::Financial { allowed_roles }
        } else if let Some(roles) = allowed_roles {
            SectionAccess::Roles(roles)
        } else {
            SectionAccess::Restricted
        };

        Self::new(
            record.id,
            record.title,
            record.kind,
            GridCell::new(record.grid_column, record.grid_row),
            GridSpan::new(record.grid_column_span, record.grid_row_span),
            access,
            record.fields,
        )
    }
}

impl From<Section> for SectionRecord {
    fn from(section: Section) -> Self {
        let role_names = |roles: RoleSet| -> Vec<String> {
            roles.iter().map(|role| role.as_str().to_owned()).collect()
        };

        let (requires_permission, permission_type, allowed_roles) = match section.access {
            SectionAccess::Open => (false, None, None),
            SectionAccess::Financial { allowed_roles } => (
                true,
                Some(FINANCIAL_PERMISSION_TYPE.to_owned()),
                allowed_roles.map(role_names),
            ),
            SectionAccess::Roles(roles) => (true, None, Some(role_names(roles))),
            SectionAccess::Restricted => (true, None, None),
        };

        Self {
            id: section.id.into(),
            title: section.title.into(),
            kind: section.kind.into(),
            grid_column: section.position.column(),
            grid_row: section.position.row(),
            grid_column_span: section.span.columns(),
            grid_row_span: section.span.rows(),
            requires_permission,
            permission_type,
            allowed_roles,
            fields: section.fields,
        }
    }
}

use intraextra_core::{AppError, AppResult};
use intraextra_domain::{Field, FieldKind, FieldList, FieldUpdate, GridSpan, SectionAccess};
use uuid::Uuid;

use super::*;

const NEW_CARD_KIND: &str = "custom";
const NEW_CARD_SPAN: (u32, u32) = (6, 4);
const NEW_CARD_FIELD_LABEL: &str = "New Field";

impl LayoutController {
    /// Appends a custom card at the grid origin with one text field.
    ///
    /// Returns the generated card id, or `None` outside edit mode.
    pub fn add_section(&mut self, title: &str) -> AppResult<Option<String>> {
        if !self.editing() {
            return Ok(None);
        }
        if title.trim().is_empty() {
            return Err(AppError::Validation(
                "card title cannot be empty".to_owned(),
            ));
        }

        let field = Field::new(
            format!("field-{}", Uuid::new_v4()),
            NEW_CARD_FIELD_LABEL,
            FieldKind::Text,
            false,
            false,
        )?;
        let section = Section::new(
            format!("card-{}", Uuid::new_v4()),
            title.trim(),
            NEW_CARD_KIND,
            GridCell::new(1, 1),
            GridSpan::new(NEW_CARD_SPAN.0, NEW_CARD_SPAN.1),
            SectionAccess::Open,
            FieldList::new(vec![field])?,
        )?;

        let section_id = section.id().as_str().to_owned();
        self.sections.push(section);
        self.touch();

        Ok(Some(section_id))
    }

    /// Deletes a card.
    pub fn remove_section(&mut self, section_id: &str) -> bool {
        if !self.editing() {
            return false;
        }

        let before = self.sections.len();
        self.sections
            .retain(|section| section.id().as_str() != section_id);
        if self.sections.len() == before {
            return false;
        }

        self.overflowing.remove(section_id);
        self.touch();
        true
    }

    /// Renames a card. Blank titles are rejected.
    pub fn rename_section(&mut self, section_id: &str, title: &str) -> AppResult<bool> {
        if !self.editing() {
            return Ok(false);
        }
        let Some(section) = self.section_mut(section_id) else {
            return Ok(false);
        };

        section.rename(title.trim())?;
        self.touch();
        Ok(true)
    }

    /// Appends a new field of the given type tag to a card.
    ///
    /// Returns the generated field id.
    pub fn add_field(&mut self, section_id: &str, type_tag: &str) -> AppResult<Option<String>> {
        if !self.editing() {
            return Ok(None);
        }
        let kind = type_tag.parse::<FieldKind>()?;
        let Some(section) = self.section_mut(section_id) else {
            return Ok(None);
        };

        let field = Field::new_of_kind(kind)?;
        let field_id = field.id().as_str().to_owned();
        section.fields_mut().push(field)?;
        self.touch();

        Ok(Some(field_id))
    }

    /// Edits a field in place.
    pub fn update_field(
        &mut self,
        section_id: &str,
        field_id: &str,
        update: FieldUpdate,
    ) -> AppResult<bool> {
        if !self.editing() {
            return Ok(false);
        }
        let Some(section) = self.section_mut(section_id) else {
            return Ok(false);
        };

        let updated = section.fields_mut().update(field_id, update)?;
        if updated {
            self.touch();
        }
        Ok(updated)
    }

    /// Removes a field from a card.
    pub fn remove_field(&mut self, section_id: &str, field_id: &str) -> bool {
        self.edit_fields(section_id, |fields| fields.remove(field_id).is_some())
    }

    /// Swaps a field with the one above it.
    pub fn move_field_up(&mut self, section_id: &str, field_id: &str) -> bool {
        self.edit_fields(section_id, |fields| fields.move_up(field_id))
    }

    /// Swaps a field with the one below it.
    pub fn move_field_down(&mut self, section_id: &str, field_id: &str) -> bool {
        self.edit_fields(section_id, |fields| fields.move_down(field_id))
    }

    fn edit_fields(
        &mut self,
        section_id: &str,
        edit: impl FnOnce(&mut FieldList) -> bool,
    ) -> bool {
        if !self.editing() {
            return false;
        }
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };

        let changed = edit(section.fields_mut());
        if changed {
            self.touch();
        }
        changed
    }
}

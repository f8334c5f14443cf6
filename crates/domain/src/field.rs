use std::str::FromStr;

use intraextra_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Input kind of a card field, carrying only the data its kind needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Numeric input.
    Number,
    /// Single choice from a fixed list.
    Dropdown {
        /// Choices offered to the user.
        #[serde(default, deserialize_with = "nullable_options")]
        options: Vec<String>,
    },
    /// Multiple choices from a fixed list.
    Multiselect {
        /// Choices offered to the user.
        #[serde(default, deserialize_with = "nullable_options")]
        options: Vec<String>,
    },
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Datetime,
    /// Postal address.
    Address,
    /// Web link.
    Url,
    /// File upload.
    File,
    /// Tabular data.
    Table,
}

impl FieldKind {
    /// Returns the stable wire tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Dropdown { .. } => "dropdown",
            Self::Multiselect { .. } => "multiselect",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Address => "address",
            Self::Url => "url",
            Self::File => "file",
            Self::Table => "table",
        }
    }

    /// Label shown in the field-type picker.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Text => "Short Text",
            Self::Textarea => "Long Text",
            Self::Number => "Number",
            Self::Dropdown { .. } => "Dropdown",
            Self::Multiselect { .. } => "Multiple Choice",
            Self::Date => "Date Only",
            Self::Time => "Time Only",
            Self::Datetime => "Date & Time",
            Self::Address => "Address",
            Self::Url => "URL",
            Self::File => "File Upload",
            Self::Table => "Table",
        }
    }

    /// Returns choice options for dropdown and multiselect kinds.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Dropdown { options } | Self::Multiselect { options } => Some(options),
            _ => None,
        }
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    /// Parses a bare type tag. Choice kinds start with two placeholder options.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let placeholder = || vec!["Option 1".to_owned(), "Option 2".to_owned()];
        match value {
            "text" => Ok(Self::Text),
            "textarea" => Ok(Self::Textarea),
            "number" => Ok(Self::Number),
            "dropdown" => Ok(Self::Dropdown {
                options: placeholder(),
            }),
            "multiselect" => Ok(Self::Multiselect {
                options: placeholder(),
            }),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "datetime" => Ok(Self::Datetime),
            "address" => Ok(Self::Address),
            "url" => Ok(Self::Url),
            "file" => Ok(Self::File),
            "table" => Ok(Self::Table),
            _ => Err(AppError::Validation(format!("unknown field type '{value}'"))),
        }
    }
}

/// One configurable input rendered inside a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    id: NonEmptyString,
    label: NonEmptyString,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    readonly: bool,
    #[serde(flatten)]
    kind: FieldKind,
}

impl Field {
    /// Creates a validated field.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        required: bool,
        readonly: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            label: NonEmptyString::new(label)?,
            required,
            readonly,
            kind,
        })
    }

    /// Creates a fresh editable field of the given kind with a generated id
    /// and a `New <Type>` label.
    pub fn new_of_kind(kind: FieldKind) -> AppResult<Self> {
        let label = format!("New {}", kind.display_label());
        Self::new(format!("field-{}", Uuid::new_v4()), label, kind, false, false)
    }

    /// Returns field id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns field label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns whether a value is required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns whether the field is read-only.
    #[must_use]
    pub fn readonly(&self) -> bool {
        self.readonly
    }

    /// Returns field kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, update: FieldUpdate) -> AppResult<()> {
        let label = update.label.map(NonEmptyString::new).transpose()?;

        if let Some(options) = &update.options {
            if update.kind.is_none() && self.kind.options().is_none() {
                return Err(AppError::Validation(format!(
                    "field '{}' of type '{}' does not take options",
                    self.id,
                    self.kind.as_str()
                )));
            }
            if options.iter().any(|option| option.trim().is_empty()) {
                return Err(AppError::Validation(
                    "field options must not be blank".to_owned(),
                ));
            }
        }

        if let Some(label) = label {
            self.label = label;
        }
        if let Some(required) = update.required {
            self.required = required;
        }
        if let Some(readonly) = update.readonly {
            self.readonly = readonly;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(new_options) = update.options {
            if let FieldKind::Dropdown { options } | FieldKind::Multiselect { options } =
                &mut self.kind
            {
                *options = new_options;
            }
        }

        Ok(())
    }
}

/// Partial field edit; `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// New label.
    pub label: Option<String>,
    /// New required flag.
    pub required: Option<bool>,
    /// New read-only flag.
    pub readonly: Option<bool>,
    /// Replacement kind.
    pub kind: Option<FieldKind>,
    /// Replacement options for choice kinds.
    pub options: Option<Vec<String>>,
}

/// Ordered field collection of a card. Order is user-visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldList(Vec<Field>);

impl TryFrom<Vec<Field>> for FieldList {
    type Error = AppError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldList> for Vec<Field> {
    fn from(list: FieldList) -> Self {
        list.0
    }
}

impl FieldList {
    /// Creates a list, rejecting duplicate ids.
    pub fn new(fields: Vec<Field>) -> AppResult<Self> {
        let mut list = Self::default();
        for field in fields {
            list.push(field)?;
        }

        Ok(list)
    }

    /// Returns the fields in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finds a field by id.
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&Field> {
        self.0.iter().find(|field| field.id().as_str() == field_id)
    }

    /// Appends a field at the end.
    pub fn push(&mut self, field: Field) -> AppResult<()> {
        if self.get(field.id().as_str()).is_some() {
            return Err(AppError::Conflict(format!(
                "field '{}' already exists",
                field.id()
            )));
        }

        self.0.push(field);
        Ok(())
    }

    /// Updates a field in place. Returns `false` for unknown ids.
    pub fn update(&mut self, field_id: &str, update: FieldUpdate) -> AppResult<bool> {
        match self.0.iter_mut().find(|field| field.id().as_str() == field_id) {
            Some(field) => {
                field.apply(update)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes a field by id, returning it.
    pub fn remove(&mut self, field_id: &str) -> Option<Field> {
        let index = self.position(field_id)?;
        Some(self.0.remove(index))
    }

    /// Swaps a field with its predecessor. No-op at the top.
    pub fn move_up(&mut self, field_id: &str) -> bool {
        match self.position(field_id) {
            Some(index) if index > 0 => {
                self.0.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Swaps a field with its successor. No-op at the bottom.
    pub fn move_down(&mut self, field_id: &str) -> bool {
        match self.position(field_id) {
            Some(index) if index + 1 < self.0.len() => {
                self.0.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    fn position(&self, field_id: &str) -> Option<usize> {
        self.0.iter().position(|field| field.id().as_str() == field_id)
    }
}

fn nullable_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

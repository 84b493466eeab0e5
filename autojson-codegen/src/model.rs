//! Metadata model for one class and its fields.
//!
//! A [`ClassMetadata`] is built once per discovered declaration and never
//! changes afterwards. The code generation engine reads it through
//! [`ClassMetadata::state_slots`], which assigns each non-ignored field the
//! state index shared by every dispatch structure in the generated code.

use crate::annotation::FieldFlags;

/// Metadata describing a single field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Canonical spelling of the field's type.
    pub declared_type_name: String,
    /// Member name as declared in the host source.
    pub member_name: String,
    /// Whether a parsed object must contain this field.
    pub required: bool,
    /// Whether the field is left out of the generated code.
    pub ignored: bool,
    /// Key the field is read from and written to.
    pub serialized_key: String,
}

impl FieldMetadata {
    /// Creates an optional, non-ignored field keyed by its member name.
    #[must_use]
    pub fn new(declared_type_name: impl Into<String>, member_name: impl Into<String>) -> Self {
        let member_name = member_name.into();
        Self {
            declared_type_name: declared_type_name.into(),
            serialized_key: member_name.clone(),
            member_name,
            required: false,
            ignored: false,
        }
    }

    /// Applies parsed annotation flags to the field.
    #[must_use]
    pub fn with_flags(self, flags: FieldFlags) -> Self {
        let serialized_key = flags.key.unwrap_or_else(|| self.member_name.clone());
        Self {
            required: flags.required,
            ignored: flags.ignore,
            serialized_key,
            ..self
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Marks the field as ignored.
    #[must_use]
    pub fn ignored(self) -> Self {
        Self {
            ignored: true,
            ..self
        }
    }

    /// Overrides the serialized key.
    #[must_use]
    pub fn keyed(self, key: impl Into<String>) -> Self {
        Self {
            serialized_key: key.into(),
            ..self
        }
    }
}

/// Metadata describing one class or struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    qualified_name: String,
    strict_unknown_keys: bool,
    fields: Vec<FieldMetadata>,
}

/// A non-ignored field paired with its state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSlot<'a> {
    /// Zero-based position among the non-ignored fields.
    pub index: usize,
    /// The field occupying this state.
    pub field: &'a FieldMetadata,
}

/// Two active fields that share a serialized key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCollision<'a> {
    /// The shared key.
    pub key: &'a str,
    /// Member that claims the key first.
    pub first: &'a str,
    /// Member declared later with the same key.
    pub second: &'a str,
}

impl ClassMetadata {
    /// Creates class metadata from its parts.
    #[must_use]
    pub fn new(
        qualified_name: impl Into<String>,
        strict_unknown_keys: bool,
        fields: Vec<FieldMetadata>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            strict_unknown_keys,
            fields,
        }
    }

    /// Fully qualified name, for example `::geo::Point`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Whether unknown keys are fatal when parsing this class.
    #[must_use]
    pub const fn strict_unknown_keys(&self) -> bool {
        self.strict_unknown_keys
    }

    /// All fields in declaration order, ignored ones included.
    #[must_use]
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Non-ignored fields with their state indices, in declaration order.
    pub fn state_slots(&self) -> impl Iterator<Item = StateSlot<'_>> {
        self.fields
            .iter()
            .filter(|field| !field.ignored)
            .enumerate()
            .map(|(index, field)| StateSlot { index, field })
    }

    /// Finds the first pair of active fields sharing a serialized key.
    #[must_use]
    pub fn first_key_collision(&self) -> Option<KeyCollision<'_>> {
        let active: Vec<&FieldMetadata> = self.fields.iter().filter(|f| !f.ignored).collect();
        active.iter().copied().enumerate().find_map(|(position, later)| {
            active
                .iter()
                .copied()
                .take(position)
                .find(|earlier| earlier.serialized_key == later.serialized_key)
                .map(|earlier| KeyCollision {
                    key: &later.serialized_key,
                    first: &earlier.member_name,
                    second: &later.member_name,
                })
        })
    }
}

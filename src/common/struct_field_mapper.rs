//! Knows which fields are struct fields and which attributes are their
//! subfields.

use ahash::{AHashMap, AHashSet};

/// Maps struct subfield attribute names (`tags.value`) to their struct
/// field (`tags`).
#[derive(Debug, Clone, Default)]
pub struct StructFieldMapper {
    struct_fields: AHashSet<String>,
    struct_subfields: AHashMap<String, String>,
}

impl StructFieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a struct field of interest without subfields.
    pub fn add_struct_field<S: Into<String>>(&mut self, struct_field: S) {
        self.struct_fields.insert(struct_field.into());
    }

    /// Declare `subfield` as a member of `struct_field`.
    pub fn add_mapping<F: Into<String>, S: Into<String>>(&mut self, struct_field: F, subfield: S) {
        let struct_field = struct_field.into();
        self.struct_subfields.insert(subfield.into(), struct_field.clone());
        self.struct_fields.insert(struct_field);
    }

    pub fn is_empty(&self) -> bool {
        self.struct_fields.is_empty()
    }

    pub fn is_struct_field(&self, name: &str) -> bool {
        self.struct_fields.contains(name)
    }

    pub fn is_struct_subfield(&self, name: &str) -> bool {
        self.struct_subfields.contains_key(name)
    }

    /// The struct field owning `subfield`.
    pub fn get_struct_field(&self, subfield: &str) -> Option<&str> {
        self.struct_subfields.get(subfield).map(String::as_str)
    }
}

//! Entity schemas and their builder.
//!
//! # Responsibility
//! - Tie a store identifier to the ordered field bindings of one record type.
//! - Validate mapped keys before a schema can enter a registry.
//!
//! # Invariants
//! - Included bindings have non-empty keys matching the store-key pattern
//!   and are unique within the schema.
//! - Field names are unique within the schema.

use super::binding::{FieldBinding, FieldDescriptor};
use super::{SchemaError, SchemaResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Characters a mapped store key may contain: one `key=value` line must stay
/// parseable, so whitespace, `=`, and comment leaders are rejected.
static STORE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid store key regex"));

/// Registered mapping schema for one record type.
pub struct EntitySchema<T> {
    store_id: String,
    fields: Vec<FieldBinding<T>>,
}

impl<T: 'static> EntitySchema<T> {
    /// Starts a builder for a schema backed by `store_id`.
    pub fn builder(store_id: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder {
            store_id: store_id.into(),
            fields: Vec::new(),
        }
    }

    /// Store identifier naming the backing flat key/value resource.
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Registered bindings in declaration order.
    pub fn bindings(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    /// Number of included (mappable) bindings.
    pub fn included_len(&self) -> usize {
        self.fields.iter().filter(|b| b.is_included()).count()
    }

    /// Serializable entity-level metadata.
    pub fn descriptor(&self) -> EntityDescriptor {
        EntityDescriptor {
            store_id: self.store_id.clone(),
        }
    }

    /// Serializable per-field metadata in declaration order.
    pub fn field_descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(FieldBinding::descriptor).collect()
    }
}

// Accessor closures have no useful Debug form; render the descriptor views
// instead.
impl<T: 'static> std::fmt::Debug for EntitySchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitySchema")
            .field("store_id", &self.store_id)
            .field("fields", &self.field_descriptors())
            .finish()
    }
}

/// Entity-level metadata as exported schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    pub store_id: String,
}

/// Builder collecting field bindings for one record type.
pub struct SchemaBuilder<T> {
    store_id: String,
    fields: Vec<FieldBinding<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Adds one field binding.
    pub fn field(mut self, binding: FieldBinding<T>) -> Self {
        self.fields.push(binding);
        self
    }

    /// Validates the collected bindings and finishes the schema.
    ///
    /// # Errors
    /// - `EmptyStoreId` when the store identifier is blank.
    /// - `DuplicateField` when a field name repeats.
    /// - `InvalidKey` when an included binding maps to a malformed key.
    /// - `DuplicateKey` when two included bindings map to the same key.
    pub fn build(self) -> SchemaResult<EntitySchema<T>> {
        if self.store_id.trim().is_empty() {
            return Err(SchemaError::EmptyStoreId);
        }

        let mut seen_fields = HashSet::new();
        let mut seen_keys = HashSet::new();
        for binding in &self.fields {
            if !seen_fields.insert(binding.name()) {
                return Err(SchemaError::DuplicateField {
                    field: binding.name(),
                });
            }
            if !binding.is_included() {
                continue;
            }
            let key = binding.mapped_key();
            if !STORE_KEY_RE.is_match(key) {
                return Err(SchemaError::InvalidKey {
                    field: binding.name(),
                    key: key.to_string(),
                });
            }
            if !seen_keys.insert(key.to_string()) {
                return Err(SchemaError::DuplicateKey {
                    key: key.to_string(),
                });
            }
        }

        Ok(EntitySchema {
            store_id: self.store_id,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::EntitySchema;
    use crate::schema::{FieldBinding, SchemaError};

    #[derive(Debug, Default)]
    struct Sample {
        count: i32,
        label: String,
    }

    fn count_binding() -> FieldBinding<Sample> {
        FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v)
    }

    fn label_binding() -> FieldBinding<Sample> {
        FieldBinding::text("label", |s: &Sample| s.label.clone(), |s, v| s.label = v)
    }

    #[test]
    fn build_accepts_unique_fields_and_keys() {
        let schema = EntitySchema::builder("sample.properties")
            .field(count_binding().key("c"))
            .field(label_binding())
            .field(FieldBinding::excluded("scratch"))
            .build()
            .unwrap();

        assert_eq!(schema.store_id(), "sample.properties");
        assert_eq!(schema.bindings().len(), 3);
        assert_eq!(schema.included_len(), 2);
    }

    #[test]
    fn build_rejects_blank_store_id() {
        let err = EntitySchema::<Sample>::builder("  ").build().unwrap_err();
        assert!(matches!(err, SchemaError::EmptyStoreId));
    }

    #[test]
    fn build_rejects_duplicate_field_names() {
        let err = EntitySchema::builder("sample.properties")
            .field(count_binding())
            .field(count_binding())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { field } if field == "count"));
    }

    #[test]
    fn build_rejects_duplicate_mapped_keys() {
        let err = EntitySchema::builder("sample.properties")
            .field(count_binding().key("x"))
            .field(label_binding().key("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { key } if key == "x"));
    }

    #[test]
    fn build_rejects_keys_with_separator_characters() {
        for bad in ["a=b", "a b", "", "a#b"] {
            let err = EntitySchema::builder("sample.properties")
                .field(count_binding().key(bad))
                .build()
                .unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidKey { field, .. } if field == "count"),
                "key `{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn debug_output_names_store_and_fields() {
        let schema = EntitySchema::builder("sample.properties")
            .field(count_binding().key("c"))
            .build()
            .unwrap();

        let rendered = format!("{schema:?}");
        assert!(rendered.contains("sample.properties"));
        assert!(rendered.contains("count"));
    }

    #[test]
    fn excluded_binding_key_is_not_validated() {
        // Exclusion wins over any key annotation; the binding never reaches
        // the store, so its key shape is irrelevant.
        let schema = EntitySchema::builder("sample.properties")
            .field(FieldBinding::<Sample>::excluded("scratch").key("not a key"))
            .build()
            .unwrap();
        assert_eq!(schema.included_len(), 0);
    }
}

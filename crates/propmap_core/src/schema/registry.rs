//! Type-keyed registry of entity schemas.
//!
//! # Responsibility
//! - Hold exactly one schema per registered record type.
//! - Resolve a type to its schema without any I/O.
//!
//! # Invariants
//! - Re-registering a type replaces its previous schema.
//! - Resolving an unregistered type is a hard error, reported before the
//!   engine touches any store.

use super::entity::EntitySchema;
use super::{SchemaError, SchemaResult};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Registry mapping record types to their entity schemas.
///
/// The registry is the caller-owned memoization of schema resolution: build
/// it once at startup, then share it read-only with every mapper.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the schema for `T`, replacing any previous registration.
    pub fn register<T: 'static>(&mut self, schema: EntitySchema<T>) {
        self.entries.insert(TypeId::of::<T>(), Box::new(schema));
    }

    /// Resolves the schema for `T`.
    ///
    /// # Errors
    /// - `NotAnEntity` when `T` was never registered.
    pub fn resolve<T: 'static>(&self) -> SchemaResult<&EntitySchema<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<EntitySchema<T>>())
            .ok_or(SchemaError::NotAnEntity {
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Whether `T` has a registered schema.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered record types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaRegistry;
    use crate::schema::{EntitySchema, FieldBinding, SchemaError};

    #[derive(Debug, Default)]
    struct Sample {
        count: i32,
    }

    #[derive(Debug, Default)]
    struct Unregistered;

    fn sample_schema(store_id: &str) -> EntitySchema<Sample> {
        EntitySchema::builder(store_id)
            .field(FieldBinding::i32(
                "count",
                |s: &Sample| s.count,
                |s, v| s.count = v,
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn resolve_returns_registered_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema("sample.properties"));

        let schema = registry.resolve::<Sample>().unwrap();
        assert_eq!(schema.store_id(), "sample.properties");
        assert!(registry.contains::<Sample>());
    }

    #[test]
    fn resolve_unregistered_type_is_not_an_entity() {
        let registry = SchemaRegistry::new();
        let err = registry.resolve::<Unregistered>().unwrap_err();
        assert!(
            matches!(err, SchemaError::NotAnEntity { type_name } if type_name.contains("Unregistered"))
        );
    }

    #[test]
    fn register_replaces_previous_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema("first.properties"));
        registry.register(sample_schema("second.properties"));

        assert_eq!(registry.len(), 1);
        let schema = registry.resolve::<Sample>().unwrap();
        assert_eq!(schema.store_id(), "second.properties");
    }
}

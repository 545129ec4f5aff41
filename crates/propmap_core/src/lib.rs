//! Core mapping engine for flat key/value persistence.
//! This crate is the single source of truth for schema and coercion rules.

pub mod engine;
pub mod logging;
pub mod scalar;
pub mod schema;
pub mod store;

pub use engine::{MapError, MapResult, Mapper};
pub use logging::{default_log_level, init_logging, logging_status};
pub use scalar::{ScalarKind, ScalarParseError, ScalarValue};
pub use schema::{
    EntityDescriptor, EntitySchema, FieldBinding, FieldDescriptor, SchemaBuilder, SchemaError,
    SchemaRegistry,
};
pub use store::{
    FileStore, FileStoreProvider, MemoryStore, MemoryStoreProvider, StoreError, StoreHandle,
    StoreProvider, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

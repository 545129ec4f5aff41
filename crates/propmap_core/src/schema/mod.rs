//! Schema registration and resolution for mapped record types.
//!
//! # Responsibility
//! - Hold the per-type registration table (store identifier + field bindings).
//! - Resolve a record type to its schema at mapping time.
//!
//! # Invariants
//! - A registry holds at most one schema per record type.
//! - Mapped keys are validated and unique within one schema.
//! - Resolution is pure metadata lookup; no I/O happens here.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod binding;
pub mod entity;
pub mod registry;

pub use binding::{FieldBinding, FieldDescriptor};
pub use entity::{EntityDescriptor, EntitySchema, SchemaBuilder};
pub use registry::SchemaRegistry;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema construction and resolution failures.
#[derive(Debug)]
pub enum SchemaError {
    NotAnEntity { type_name: &'static str },
    EmptyStoreId,
    InvalidKey { field: &'static str, key: String },
    DuplicateKey { key: String },
    DuplicateField { field: &'static str },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnEntity { type_name } => {
                write!(f, "type `{type_name}` has no registered entity schema")
            }
            Self::EmptyStoreId => write!(f, "entity store identifier cannot be empty"),
            Self::InvalidKey { field, key } => {
                write!(f, "field `{field}` maps to invalid store key `{key}`")
            }
            Self::DuplicateKey { key } => {
                write!(f, "store key `{key}` is mapped by more than one field")
            }
            Self::DuplicateField { field } => {
                write!(f, "field `{field}` is registered more than once")
            }
        }
    }
}

impl Error for SchemaError {}

//! Mapping engine: record-to-flat-store load and save.
//!
//! # Responsibility
//! - Orchestrate schema resolution, store access, and scalar coercion.
//! - Report every failure with the offending type/field/key attached.
//!
//! # Invariants
//! - Schema resolution happens before any store access.
//! - Load yields a fully populated instance or an error, never a partial
//!   result.
//! - Save mutates the backing resource only at the flush boundary.

use crate::scalar::{ScalarKind, ScalarParseError};
use crate::schema::SchemaError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod mapper;

pub use mapper::Mapper;

pub type MapResult<T> = Result<T, MapError>;

/// Mapping failures for load and save.
#[derive(Debug)]
pub enum MapError {
    /// Schema registration or resolution failed.
    Schema(SchemaError),
    /// The backing resource could not be opened or read.
    StoreUnavailable {
        store_id: String,
        source: StoreError,
    },
    /// The backing resource could not be persisted on flush.
    StoreWriteFailure {
        store_id: String,
        source: StoreError,
    },
    /// A stored string could not be coerced into the field's scalar kind.
    Coercion {
        field: &'static str,
        key: String,
        raw: String,
        source: ScalarParseError,
    },
    /// A binding's declared kind and its accessors disagree.
    KindMismatch {
        field: &'static str,
        declared: ScalarKind,
        supplied: ScalarKind,
    },
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "{err}"),
            Self::StoreUnavailable { store_id, source } => {
                write!(f, "store `{store_id}` unavailable: {source}")
            }
            Self::StoreWriteFailure { store_id, source } => {
                write!(f, "store `{store_id}` write failed: {source}")
            }
            Self::Coercion {
                field,
                key,
                raw,
                source,
            } => write!(
                f,
                "cannot coerce value `{raw}` of key `{key}` for field `{field}`: {source}"
            ),
            Self::KindMismatch {
                field,
                declared,
                supplied,
            } => {
                if declared == supplied {
                    write!(
                        f,
                        "accessor for field `{field}` rejected a {declared} value"
                    )
                } else {
                    write!(
                        f,
                        "field `{field}` is declared {declared} but its accessor produced {supplied}"
                    )
                }
            }
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::StoreUnavailable { source, .. } => Some(source),
            Self::StoreWriteFailure { source, .. } => Some(source),
            Self::Coercion { source, .. } => Some(source),
            Self::KindMismatch { .. } => None,
        }
    }
}

impl From<SchemaError> for MapError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

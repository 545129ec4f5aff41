//! Flat key/value store collaborator.
//!
//! # Responsibility
//! - Define the open/get/set/flush seam the mapping engine works against.
//! - Provide the file-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` mutates only the handle; the backing resource changes on `flush`.
//! - A handle belongs to one store identifier and one operation.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod file;
pub mod memory;

pub use file::{FileStore, FileStoreProvider};
pub use memory::{MemoryStore, MemoryStoreProvider};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store I/O and format failures.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Malformed {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store I/O error at `{}`: {source}", path.display())
            }
            Self::Malformed {
                path,
                line_no,
                line,
            } => write!(
                f,
                "malformed store line {line_no} in `{}`: `{line}`",
                path.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

/// Opens store handles by store identifier.
pub trait StoreProvider {
    type Handle: StoreHandle;

    /// Acquires a fresh handle for one load or save operation.
    fn open(&self, store_id: &str) -> StoreResult<Self::Handle>;
}

/// One open flat key→string mapping.
pub trait StoreHandle {
    /// Looks up `key`, falling back to `default` when absent.
    fn get(&self, key: &str, default: &str) -> String;

    /// Sets `key` in the handle; visible to the backing resource after
    /// `flush`.
    fn set(&mut self, key: &str, value: &str);

    /// Persists the handle's entries to the backing resource.
    fn flush(&mut self) -> StoreResult<()>;
}

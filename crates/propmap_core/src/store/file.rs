//! File-backed properties store.
//!
//! # Responsibility
//! - Parse `key=value`-per-line files into a handle.
//! - Persist handles atomically via a temp-file rename on flush.
//!
//! # Invariants
//! - Blank lines and `#`/`!` comment lines are ignored on read.
//! - A missing backing file opens as an empty handle and is created on the
//!   first flush.
//! - Keys are written in sorted order so flushed files are deterministic.
//! - Values round-trip verbatim: everything after the first `=` is data, and
//!   line breaks and backslashes are escaped on flush (`\n`, `\r`, `\\`) so
//!   one entry always stays one parseable line.

use super::{StoreError, StoreHandle, StoreProvider, StoreResult};
use log::{error, info};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Provider treating every store identifier as a filesystem path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStoreProvider;

impl FileStoreProvider {
    pub fn new() -> Self {
        Self
    }
}

impl StoreProvider for FileStoreProvider {
    type Handle = FileStore;

    fn open(&self, store_id: &str) -> StoreResult<FileStore> {
        FileStore::open(store_id)
    }
}

/// Handle over one properties file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the properties file at `path`.
    ///
    /// # Errors
    /// - `Io` when the file exists but cannot be read.
    /// - `Malformed` when a non-comment line has no `=` separator or an
    ///   empty key.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| {
                error!(
                    "event=store_open module=store status=error path={} duration_ms={} error_code=store_read_failed error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    source
                );
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            parse_properties(&path, &contents)?
        } else {
            BTreeMap::new()
        };

        info!(
            "event=store_open module=store status=ok path={} entries={} duration_ms={}",
            path.display(),
            entries.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries currently held by the handle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the handle currently holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl StoreHandle for FileStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();

        let mut body = String::new();
        for (key, value) in &self.entries {
            body.push_str(key);
            body.push('=');
            body.push_str(&escape_value(value));
            body.push('\n');
        }

        // Write-then-rename keeps the flush atomic at the filesystem level:
        // readers see either the previous file or the full new one.
        let tmp_path = tmp_sibling(&self.path);
        let result = std::fs::write(&tmp_path, body.as_bytes())
            .and_then(|()| std::fs::rename(&tmp_path, &self.path));

        match result {
            Ok(()) => {
                info!(
                    "event=store_flush module=store status=ok path={} entries={} duration_ms={}",
                    self.path.display(),
                    self.entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_flush module=store status=error path={} duration_ms={} error_code=store_write_failed error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn malformed_line(path: &Path, idx: usize, line: &str) -> StoreError {
    StoreError::Malformed {
        path: path.to_path_buf(),
        line_no: idx + 1,
        line: line.to_string(),
    }
}

fn parse_properties(path: &Path, contents: &str) -> StoreResult<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();
    for (idx, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some((raw_key, raw_value)) = trimmed.split_once('=') else {
            return Err(malformed_line(path, idx, line));
        };
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(malformed_line(path, idx, line));
        }
        entries.insert(key.to_string(), unescape_value(raw_value));
    }
    Ok(entries)
}

/// Escapes the characters that would break the one-entry-per-line format.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn unescape_value(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('\\') => value.push('\\'),
            // Unknown escape: keep the escaped character as-is.
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

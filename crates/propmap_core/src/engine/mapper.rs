//! Load/save orchestration over a schema registry and a store provider.
//!
//! # Responsibility
//! - Walk the registered bindings of a record type and move values between
//!   the instance and one store handle.
//!
//! # Invariants
//! - Excluded bindings are never read from or written to the store.
//! - An empty resolved value leaves the target field at its zero value.
//! - Each operation acquires its own handle and releases it on every exit
//!   path.

use super::{MapError, MapResult};
use crate::schema::SchemaRegistry;
use crate::store::{StoreHandle, StoreProvider};
use log::{error, info};
use std::time::Instant;

/// Mapping engine bound to one registry and one store provider.
pub struct Mapper<'r, P: StoreProvider> {
    registry: &'r SchemaRegistry,
    provider: P,
}

impl<'r, P: StoreProvider> Mapper<'r, P> {
    /// Creates a mapper over a caller-owned registry and provider.
    pub fn new(registry: &'r SchemaRegistry, provider: P) -> Self {
        Self { registry, provider }
    }

    /// Loads a freshly constructed `T` from its registered store.
    ///
    /// # Contract
    /// - Resolves the schema before any store access.
    /// - Starts from `T::default()` and assigns every included field whose
    ///   resolved store value is non-empty.
    ///
    /// # Errors
    /// - `Schema(NotAnEntity)` when `T` has no registered schema.
    /// - `StoreUnavailable` when the backing resource cannot be opened.
    /// - `Coercion` when a stored value cannot be parsed into the field's
    ///   scalar kind.
    /// - `KindMismatch` when a binding's accessors reject the parsed value.
    pub fn load<T: Default + 'static>(&self) -> MapResult<T> {
        let started_at = Instant::now();
        let entity = std::any::type_name::<T>();

        let schema = match self.registry.resolve::<T>() {
            Ok(schema) => schema,
            Err(err) => {
                error!(
                    "event=entity_load module=engine status=error entity={entity} error_code=not_an_entity error={err}"
                );
                return Err(err.into());
            }
        };

        let handle = self
            .provider
            .open(schema.store_id())
            .map_err(|source| MapError::StoreUnavailable {
                store_id: schema.store_id().to_string(),
                source,
            })
            .map_err(|err| log_load_error(entity, schema.store_id(), "store_open_failed", err))?;

        let mut record = T::default();
        for binding in schema.bindings() {
            let Some(declared) = binding.kind() else {
                continue;
            };
            let raw = handle.get(binding.mapped_key(), binding.default());
            if raw.is_empty() {
                continue;
            }
            let value = declared
                .parse(&raw)
                .map_err(|source| MapError::Coercion {
                    field: binding.name(),
                    key: binding.mapped_key().to_string(),
                    raw: raw.clone(),
                    source,
                })
                .map_err(|err| {
                    log_load_error(entity, schema.store_id(), "coercion_failed", err)
                })?;
            if !binding.assign(&mut record, value) {
                let err = MapError::KindMismatch {
                    field: binding.name(),
                    declared,
                    supplied: declared,
                };
                return Err(log_load_error(
                    entity,
                    schema.store_id(),
                    "kind_mismatch",
                    err,
                ));
            }
        }

        info!(
            "event=entity_load module=engine status=ok entity={entity} store_id={} fields={} duration_ms={}",
            schema.store_id(),
            schema.included_len(),
            started_at.elapsed().as_millis()
        );

        Ok(record)
    }

    /// Saves `record` into its registered store and flushes it.
    ///
    /// # Contract
    /// - Writes every included field's mapped key; a field holding no value
    ///   writes an empty string.
    /// - The backing resource changes only at the final flush.
    ///
    /// # Errors
    /// - `Schema(NotAnEntity)` when `T` has no registered schema.
    /// - `StoreUnavailable` when the backing resource cannot be opened.
    /// - `KindMismatch` when a getter produces a value of the wrong kind.
    /// - `StoreWriteFailure` when the flush fails.
    pub fn save<T: 'static>(&self, record: &T) -> MapResult<()> {
        let started_at = Instant::now();
        let entity = std::any::type_name::<T>();

        let schema = match self.registry.resolve::<T>() {
            Ok(schema) => schema,
            Err(err) => {
                error!(
                    "event=entity_save module=engine status=error entity={entity} error_code=not_an_entity error={err}"
                );
                return Err(err.into());
            }
        };

        let mut handle = self
            .provider
            .open(schema.store_id())
            .map_err(|source| MapError::StoreUnavailable {
                store_id: schema.store_id().to_string(),
                source,
            })
            .map_err(|err| log_save_error(entity, schema.store_id(), "store_open_failed", err))?;

        for binding in schema.bindings() {
            let Some(declared) = binding.kind() else {
                continue;
            };
            let rendered = match binding.read(record) {
                Some(value) => {
                    let supplied = value.kind();
                    if supplied != declared {
                        let err = MapError::KindMismatch {
                            field: binding.name(),
                            declared,
                            supplied,
                        };
                        return Err(log_save_error(
                            entity,
                            schema.store_id(),
                            "kind_mismatch",
                            err,
                        ));
                    }
                    value.render()
                }
                None => String::new(),
            };
            handle.set(binding.mapped_key(), &rendered);
        }

        handle
            .flush()
            .map_err(|source| MapError::StoreWriteFailure {
                store_id: schema.store_id().to_string(),
                source,
            })
            .map_err(|err| log_save_error(entity, schema.store_id(), "store_flush_failed", err))?;

        info!(
            "event=entity_save module=engine status=ok entity={entity} store_id={} fields={} duration_ms={}",
            schema.store_id(),
            schema.included_len(),
            started_at.elapsed().as_millis()
        );

        Ok(())
    }
}

fn log_load_error(entity: &str, store_id: &str, error_code: &str, err: MapError) -> MapError {
    error!(
        "event=entity_load module=engine status=error entity={entity} store_id={store_id} error_code={error_code} error={err}"
    );
    err
}

fn log_save_error(entity: &str, store_id: &str, error_code: &str, err: MapError) -> MapError {
    error!(
        "event=entity_save module=engine status=error entity={entity} store_id={store_id} error_code={error_code} error={err}"
    );
    err
}

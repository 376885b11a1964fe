//! # Record Store
//!
//! Owns the durable collection of daily updates under a single backend key.
//!
//! ## Invariants
//! - Every mutation is read-whole-collection, apply, write-whole-collection
//!   under one lock
//! - A failed write leaves the stored collection unchanged
//! - Ids are never reissued during the process lifetime, even after delete
//! - An unreadable stored value is treated as an empty collection

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::backend::KeyValueStore;
use super::errors::{StoreError, StoreResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{DailyUpdate, Record, RecordId, ValidRecord};

/// Default backend key for the collection
pub const DEFAULT_STORAGE_KEY: &str = "dailyUpdates";

/// Durable collection of `Record`s
#[derive(Debug)]
pub struct RecordStore<K: KeyValueStore> {
    backend: K,
    key: String,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
    /// Every id loaded or issued by this store
    seen_ids: Mutex<HashSet<RecordId>>,
}

fn poisoned() -> StoreError {
    StoreError::Internal("record store lock poisoned".into())
}

impl<K: KeyValueStore> RecordStore<K> {
    /// Open a store over `backend`, reading and writing only `key`.
    pub fn open(backend: K, key: impl Into<String>) -> StoreResult<Self> {
        let store = Self {
            backend,
            key: key.into(),
            write_lock: Mutex::new(()),
            seen_ids: Mutex::new(HashSet::new()),
        };
        let records = store.load()?;
        log_event_with_fields(
            Event::StoreOpened,
            &[("key", &store.key), ("records", &records.len().to_string())],
        );
        Ok(store)
    }

    /// Open a store on the default key
    pub fn with_default_key(backend: K) -> StoreResult<Self> {
        Self::open(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Full collection in storage (insertion) order
    pub fn list(&self) -> StoreResult<Vec<Record>> {
        self.load()
    }

    /// Exact id lookup. Absence is `Ok(None)`, not an error.
    pub fn get_by_id(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        Ok(self.load()?.into_iter().find(|r| &r.id == id))
    }

    /// Append a validated record under a fresh id.
    pub fn create(&self, valid: ValidRecord) -> StoreResult<RecordId> {
        let _guard = self.lock_writes()?;
        let mut records = self.load()?;

        let id = self.fresh_id(&records)?;
        records.push(Record {
            id: id.clone(),
            fields: valid.into_inner(),
        });
        self.save(&records)?;

        log_event_with_fields(
            Event::RecordCreated,
            &[("id", id.as_str()), ("records", &records.len().to_string())],
        );
        Ok(id)
    }

    /// Replace every field of the record with `id`, keeping its id and
    /// position.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has `id`; nothing is written in that case.
    pub fn update_by_id(&self, id: &RecordId, valid: ValidRecord) -> StoreResult<()> {
        self.update_with(id, |_| Ok::<_, StoreError>(valid))
    }

    /// Replace the record with `id` by a value derived from its current
    /// fields.
    ///
    /// `apply` runs inside the write critical section against the latest
    /// stored fields, so no mutation can land between the read and the
    /// write. If `apply` fails, nothing is written and its error is
    /// returned.
    pub fn update_with<E, F>(&self, id: &RecordId, apply: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnOnce(&DailyUpdate) -> Result<ValidRecord, E>,
    {
        let _guard = self.lock_writes()?;
        let mut records = self.load()?;

        let Some(slot) = records.iter_mut().find(|r| &r.id == id) else {
            log_event_with_fields(Event::RecordUpdateMissing, &[("id", id.as_str())]);
            return Err(StoreError::NotFound(id.to_string()).into());
        };
        slot.fields = apply(&slot.fields)?.into_inner();
        self.save(&records)?;

        log_event_with_fields(Event::RecordUpdated, &[("id", id.as_str())]);
        Ok(())
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// deleting a missing id is not an error and writes nothing.
    pub fn delete_by_id(&self, id: &RecordId) -> StoreResult<bool> {
        let _guard = self.lock_writes()?;
        let mut records = self.load()?;

        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;

        log_event_with_fields(
            Event::RecordDeleted,
            &[("id", id.as_str()), ("records", &records.len().to_string())],
        );
        Ok(true)
    }

    fn lock_writes(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| poisoned())
    }

    fn load(&self) -> StoreResult<Vec<Record>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let records: Vec<Record> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                log_event_with_fields(
                    Event::StoreCorruptionRecovered,
                    &[("key", &self.key), ("reason", &e.to_string())],
                );
                return Ok(Vec::new());
            }
        };

        let mut seen = self.seen_ids.lock().map_err(|_| poisoned())?;
        seen.extend(records.iter().map(|r| r.id.clone()));
        Ok(records)
    }

    fn save(&self, records: &[Record]) -> StoreResult<()> {
        let content = serde_json::to_string(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set(&self.key, &content).map_err(|e| {
            log_event_with_fields(
                Event::StoreWriteFailed,
                &[("key", &self.key), ("reason", &e.to_string())],
            );
            e
        })
    }

    fn fresh_id(&self, records: &[Record]) -> StoreResult<RecordId> {
        let mut seen = self.seen_ids.lock().map_err(|_| poisoned())?;
        seen.extend(records.iter().map(|r| r.id.clone()));
        loop {
            let id = RecordId::generate();
            if seen.insert(id.clone()) {
                return Ok(id);
            }
        }
    }
}

//! In-process store for dry runs and tests.
//!
//! Behaves like the host for everything the populator relies on: exact-name
//! lookup, sequential ids, and uploads recorded against a record field.
//! Like the host, it does not enforce unique names.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use gog_catalog_core::{
    EntityFilter, EntityKind, EntityRecord, EntityStore, FindResult, ImageField, ImageUpload,
    MediaUploader, NewEntity, Pagination, StoreError,
};

/// An upload accepted by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub ref_id: u64,
    pub ref_uid: String,
    pub field: ImageField,
    pub filename: String,
    pub size: usize,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<EntityKind, Vec<EntityRecord>>,
    payloads: HashMap<(EntityKind, u64), NewEntity>,
    uploads: Vec<StoredUpload>,
    next_id: u64,
    find_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    reject_uploads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose upload endpoint answers every request with HTTP 500.
    pub fn rejecting_uploads() -> Self {
        Self {
            reject_uploads: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Poisoning is ignored; records stay readable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.lock().records.get(&kind).map_or(0, Vec::len)
    }

    pub fn records(&self, kind: EntityKind) -> Vec<EntityRecord> {
        self.lock().records.get(&kind).cloned().unwrap_or_default()
    }

    /// The payload a record was created from.
    pub fn payload(&self, kind: EntityKind, id: u64) -> Option<NewEntity> {
        self.lock().payloads.get(&(kind, id)).cloned()
    }

    pub fn uploads(&self) -> Vec<StoredUpload> {
        self.lock().uploads.clone()
    }

    pub fn uploads_for(&self, ref_id: u64, field: ImageField) -> usize {
        self.lock()
            .uploads
            .iter()
            .filter(|u| u.ref_id == ref_id && u.field == field)
            .count()
    }

    /// Number of `find` queries served so far.
    pub fn find_calls(&self) -> usize {
        self.lock().find_calls
    }
}

impl EntityStore for MemoryStore {
    async fn find(&self, kind: EntityKind, filter: &EntityFilter) -> Result<FindResult, StoreError> {
        let mut inner = self.lock();
        inner.find_calls += 1;

        let results: Vec<EntityRecord> = inner
            .records
            .get(&kind)
            .map(|records| records.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();

        let total = results.len() as u32;
        Ok(FindResult {
            results,
            pagination: Pagination {
                page: 1,
                page_size: 25,
                page_count: total.div_ceil(25).max(1),
                total,
            },
        })
    }

    async fn create(&self, kind: EntityKind, data: &NewEntity) -> Result<EntityRecord, StoreError> {
        let mut inner = self.lock();
        inner.next_id += 1;

        let record = EntityRecord {
            id: inner.next_id,
            name: data.name().to_string(),
            slug: data.slug().to_string(),
        };
        inner
            .records
            .entry(kind)
            .or_default()
            .push(record.clone());
        inner.payloads.insert((kind, record.id), data.clone());

        log::debug!("memory: created {} #{} '{}'", kind, record.id, record.name);
        Ok(record)
    }
}

impl MediaUploader for MemoryStore {
    async fn upload(&self, upload: ImageUpload) -> Result<(), StoreError> {
        if self.reject_uploads {
            return Err(StoreError::Status {
                status: 500,
                message: "upload rejected".to_string(),
            });
        }

        self.lock().uploads.push(StoredUpload {
            ref_id: upload.ref_id,
            ref_uid: upload.ref_uid,
            field: upload.field,
            filename: upload.filename,
            size: upload.bytes.len(),
        });
        Ok(())
    }
}

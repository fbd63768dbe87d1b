//! Collaborator traits for the host framework.
//!
//! The populator never reaches for a global service locator: it receives an
//! [`EntityStore`] and a [`MediaUploader`] handle and talks to the host only
//! through them.

use std::future::Future;

use crate::entity::{EntityFilter, EntityRecord, FindResult, NewEntity};
use crate::error::StoreError;
use crate::kind::EntityKind;
use crate::media::ImageUpload;

/// Generic CRUD capability of the host framework, per entity kind.
pub trait EntityStore: Send + Sync {
    /// Query records of `kind` matching `filter`.
    fn find(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> impl Future<Output = Result<FindResult, StoreError>> + Send;

    /// Create a record of `kind` and return it as stored.
    fn create(
        &self,
        kind: EntityKind,
        data: &NewEntity,
    ) -> impl Future<Output = Result<EntityRecord, StoreError>> + Send;

    /// First record of `kind` whose name equals `name` exactly.
    fn find_by_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> impl Future<Output = Result<Option<EntityRecord>, StoreError>> + Send {
        let filter = EntityFilter::name(name);
        async move { Ok(self.find(kind, &filter).await?.first()) }
    }
}

/// File-upload capability of the host framework.
pub trait MediaUploader: Send + Sync {
    fn upload(&self, upload: ImageUpload) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Typed handle for one entity kind, so call sites read
/// `handle.find_by_name(name)` instead of threading the kind everywhere.
pub struct Collection<'a, S: EntityStore> {
    store: &'a S,
    kind: EntityKind,
}

impl<'a, S: EntityStore> Collection<'a, S> {
    pub fn new(store: &'a S, kind: EntityKind) -> Self {
        Self { store, kind }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<EntityRecord>, StoreError> {
        self.store.find_by_name(self.kind, name).await
    }

    pub async fn create(&self, data: &NewEntity) -> Result<EntityRecord, StoreError> {
        self.store.create(self.kind, data).await
    }
}

impl<S: EntityStore> Clone for Collection<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: EntityStore> Copy for Collection<'_, S> {}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
